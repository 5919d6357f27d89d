//! Evolution loop
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: evolve_with_callback() - orchestration
//! - Level 2: prepare_run(), initial_population(), run_generation()
//! - Level 3: replace_with_fresh(), refine_survivors(), evaluate_all()
//! - Level 4: configuration and result types
//!
//! Each generation, in a population ranked worst-first:
//! - slots `0..3*(P/4)` are refilled with freshly generated schedules
//! - slots `3*(P/4)..P-1` are replaced by mutated copies of themselves
//! - slot `P-1`, the current best, is left alone
//!
//! so the best fitness can never go down from one generation to the next.

use league_core::eval::evaluate;
use league_core::{
    evaluate_candidate, padded_team_count, Candidate, ConfigError, DistanceMatrix, FitnessConfig,
    Schedule, ScoreBreakdown,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::mutation::{mutate_schedule, MutationConfig};
use crate::population::{BuildReport, PopulationBuilder, DEFAULT_MAX_ATTEMPTS};
use crate::selection::{best_candidate, mean_fitness, rank_population};

// ============================================================================
// CONFIGURATION AND RESULTS (Level 4)
// ============================================================================

/// Evolution configuration
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Stop as soon as the best fitness reaches this value
    pub target_fitness: f64,
    /// Generator attempt budget for each population build
    pub max_attempts: usize,
    pub mutation: MutationConfig,
    pub fitness: FitnessConfig,
    /// Evaluate and mutate candidates on the rayon thread pool.
    /// Mutation then draws from per-slot RNGs seeded by the master RNG, so a
    /// seed still fixes the run, but not the same run as sequential mode.
    pub parallel: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 90,
            max_generations: 300,
            target_fitness: 0.85,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            mutation: MutationConfig::default(),
            fitness: FitnessConfig::default(),
            parallel: false,
        }
    }
}

impl EvolutionConfig {
    pub fn with_fitness(mut self, fitness: FitnessConfig) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if !self.target_fitness.is_finite() {
            return Err(ConfigError::InvalidTarget(self.target_fitness));
        }
        let p = self.mutation.swap_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidProbability {
                name: "swap probability",
                value: p,
            });
        }
        self.fitness.validate()
    }
}

/// Errors that stop a run before it starts
#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no valid schedule for {teams} teams in {attempts} attempts")]
    NoFeasibleSchedule { teams: usize, attempts: usize },
}

/// Snapshot handed to the progress callback after each generation
#[derive(Clone, Debug)]
pub struct GenerationStats {
    /// 1-based generation number
    pub generation: usize,
    pub population_size: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_breakdown: ScoreBreakdown,
    /// Generator activity for this generation's fresh schedules
    pub build: BuildReport,
}

/// Outcome of a run
#[derive(Clone, Debug)]
pub struct EvolutionResult {
    pub best: Candidate,
    pub breakdown: ScoreBreakdown,
    /// Final population, ranked worst-first
    pub population: Vec<Candidate>,
    pub initial_best_fitness: f64,
    pub best_fitness_history: Vec<f64>,
    pub mean_fitness_history: Vec<f64>,
    pub generations_run: usize,
    pub reached_target: bool,
    /// Generator activity over the whole run, initial build included
    pub build_totals: BuildReport,
}

/// Everything fixed for the length of a run
struct RunContext<'a> {
    distances: DistanceMatrix,
    builder: PopulationBuilder,
    config: &'a EvolutionConfig,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Evolve a schedule for `teams` teams without progress reporting
pub fn evolve<R: Rng>(
    teams: usize,
    distances: &DistanceMatrix,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<EvolutionResult, EvolveError> {
    evolve_with_callback(teams, distances, config, |_| {}, rng)
}

/// Evolve a schedule for `teams` teams.
///
/// `distances` is either `teams x teams` or already padded for the bye team.
/// `callback` runs after every generation.
pub fn evolve_with_callback<R, C>(
    teams: usize,
    distances: &DistanceMatrix,
    config: &EvolutionConfig,
    mut callback: C,
    rng: &mut R,
) -> Result<EvolutionResult, EvolveError>
where
    R: Rng,
    C: FnMut(&GenerationStats),
{
    let ctx = prepare_run(teams, distances, config)?;
    let mut build_totals = BuildReport::default();

    let mut population = initial_population(&ctx, &mut build_totals, rng)?;
    let initial_best_fitness = best_fitness(&population);
    tracing::info!(
        "Initial population: {} schedules for {} teams, best={:.4}",
        population.len(),
        ctx.builder.team_count(),
        initial_best_fitness
    );

    let mut best_fitness_history = Vec::new();
    let mut mean_fitness_history = Vec::new();
    let mut generation = 0;

    while best_fitness(&population) < config.target_fitness && generation < config.max_generations {
        let build = run_generation(&ctx, &mut population, rng);
        build_totals.absorb(&build);
        generation += 1;

        let Some(stats) = generation_stats(&ctx, &population, generation, build) else {
            break;
        };
        tracing::debug!(
            "Generation {}: {} mean={:.4}",
            generation,
            stats.best_breakdown,
            stats.mean_fitness
        );
        best_fitness_history.push(stats.best_fitness);
        mean_fitness_history.push(stats.mean_fitness);
        callback(&stats);
    }

    let best = match best_candidate(&population) {
        Some(best) => best.clone(),
        None => {
            return Err(EvolveError::NoFeasibleSchedule {
                teams: ctx.builder.team_count(),
                attempts: build_totals.attempts,
            })
        }
    };
    let breakdown = evaluate(&best.schedule, &ctx.distances, &config.fitness);

    if build_totals.underflowed() {
        tracing::warn!(
            "{} population slots were filled by duplication during the run",
            build_totals.duplicated
        );
    }

    Ok(EvolutionResult {
        reached_target: best.fitness >= config.target_fitness,
        best,
        breakdown,
        population,
        initial_best_fitness,
        best_fitness_history,
        mean_fitness_history,
        generations_run: generation,
        build_totals,
    })
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Validate the configuration and pad the league for a bye team if needed
fn prepare_run<'a>(
    teams: usize,
    distances: &DistanceMatrix,
    config: &'a EvolutionConfig,
) -> Result<RunContext<'a>, ConfigError> {
    config.validate()?;
    if teams == 0 {
        return Err(ConfigError::NoTeams);
    }

    let padded = padded_team_count(teams);
    if distances.size() != teams && distances.size() != padded {
        return Err(ConfigError::DistanceSizeMismatch {
            teams,
            size: distances.size(),
        });
    }

    Ok(RunContext {
        distances: distances.padded_to(padded)?,
        builder: PopulationBuilder::new(teams).with_max_attempts(config.max_attempts),
        config,
    })
}

/// Build, score and rank the first population
fn initial_population<R: Rng>(
    ctx: &RunContext<'_>,
    build_totals: &mut BuildReport,
    rng: &mut R,
) -> Result<Vec<Candidate>, EvolveError> {
    let (schedules, report) = ctx.builder.build(ctx.config.population_size, rng);
    build_totals.absorb(&report);

    if schedules.is_empty() {
        return Err(EvolveError::NoFeasibleSchedule {
            teams: ctx.builder.team_count(),
            attempts: report.attempts,
        });
    }

    let mut population = evaluate_all(ctx, schedules);
    rank_population(&mut population);
    Ok(population)
}

/// One generation: refill the bottom three quarters, mutate the rest but
/// the best, re-rank
fn run_generation<R: Rng>(
    ctx: &RunContext<'_>,
    population: &mut [Candidate],
    rng: &mut R,
) -> BuildReport {
    let size = population.len();
    let fresh_slots = 3 * (size / 4);
    let survivors_end = size.saturating_sub(1);

    let build = replace_with_fresh(ctx, &mut population[..fresh_slots], rng);
    refine_survivors(ctx, &mut population[fresh_slots..survivors_end], rng);
    rank_population(population);

    build
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Overwrite `slots` with newly generated, scored schedules.
///
/// If the generator produced nothing the slots keep their candidates.
fn replace_with_fresh<R: Rng>(
    ctx: &RunContext<'_>,
    slots: &mut [Candidate],
    rng: &mut R,
) -> BuildReport {
    if slots.is_empty() {
        return BuildReport::default();
    }

    let (schedules, report) = ctx.builder.build(slots.len(), rng);
    if schedules.len() < slots.len() {
        tracing::warn!("No fresh schedules this generation, keeping {} candidates", slots.len());
        return report;
    }

    for (slot, candidate) in slots.iter_mut().zip(evaluate_all(ctx, schedules)) {
        *slot = candidate;
    }
    report
}

/// Replace each candidate in `slots` with a scored mutation of itself.
///
/// Sequential runs mutate straight from `rng`. The parallel path draws one
/// seed per slot from `rng` up front so the outcome does not depend on how
/// the work is scheduled across threads.
fn refine_survivors<R: Rng>(ctx: &RunContext<'_>, slots: &mut [Candidate], rng: &mut R) {
    if ctx.config.parallel {
        let seeds: Vec<u64> = slots.iter().map(|_| rng.gen()).collect();
        slots
            .par_iter_mut()
            .zip(seeds.into_par_iter())
            .for_each(|(slot, seed)| {
                let mut slot_rng = ChaCha8Rng::seed_from_u64(seed);
                mutate_slot(ctx, slot, &mut slot_rng);
            });
    } else {
        for slot in slots.iter_mut() {
            mutate_slot(ctx, slot, rng);
        }
    }
}

fn mutate_slot<R: Rng>(ctx: &RunContext<'_>, slot: &mut Candidate, rng: &mut R) {
    let schedule = mutate_schedule(&slot.schedule, &ctx.config.mutation, rng);
    *slot = evaluate_candidate(schedule, &ctx.distances, &ctx.config.fitness);
}

/// Score schedules, preserving order
fn evaluate_all(ctx: &RunContext<'_>, schedules: Vec<Schedule>) -> Vec<Candidate> {
    let fitness = &ctx.config.fitness;
    if ctx.config.parallel {
        schedules
            .into_par_iter()
            .map(|schedule| evaluate_candidate(schedule, &ctx.distances, fitness))
            .collect()
    } else {
        schedules
            .into_iter()
            .map(|schedule| evaluate_candidate(schedule, &ctx.distances, fitness))
            .collect()
    }
}

/// Summarize a ranked population; `None` only for an empty one
fn generation_stats(
    ctx: &RunContext<'_>,
    population: &[Candidate],
    generation: usize,
    build: BuildReport,
) -> Option<GenerationStats> {
    let best = best_candidate(population)?;
    let best_breakdown = evaluate(&best.schedule, &ctx.distances, &ctx.config.fitness);

    Some(GenerationStats {
        generation,
        population_size: population.len(),
        best_fitness: best_breakdown.fitness,
        mean_fitness: mean_fitness(population),
        best_breakdown,
        build,
    })
}

/// Fitness of the last (best) candidate of a ranked population
fn best_fitness(population: &[Candidate]) -> f64 {
    best_candidate(population).map_or(f64::NEG_INFINITY, |c| c.fitness)
}
