//! Evolution command - search for a balanced double round-robin schedule
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_evolution_config(), run_evolution(), save_results()
//! - Level 3: save_champions(), save_fitness_history(), etc.
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand_chacha::ChaCha8Rng;

use league_core::eval::log_breakdown;
use league_core::Schedule;
use league_evolve::{
    evolve_with_callback, select_elite, EvolutionConfig, EvolutionResult, GenerationStats,
    MutationConfig,
};

use crate::create_rng;
use crate::league::League;
use crate::report::{format_breakdown, format_matchdays};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct EvolveArgs {
    /// League definition (JSON with "teams" and "distances"); demo league if omitted
    #[arg(long, value_name = "FILE")]
    pub league: Option<PathBuf>,

    /// Population size
    #[arg(long, default_value = "90")]
    pub population: usize,

    /// Maximum number of generations
    #[arg(long, default_value = "300")]
    pub generations: usize,

    /// Stop once the best fitness reaches this value
    #[arg(long, default_value = "0.85")]
    pub target: f64,

    /// Generator attempts per population build
    #[arg(long, default_value = "1000000")]
    pub max_attempts: usize,

    /// Per-team chance of swapping two matchdays during mutation (0.0-1.0)
    #[arg(long, default_value = "0.8")]
    pub swap_probability: f64,

    /// Normalize metrics against bounds derived from the league instead of
    /// the 12-team demo calibration
    #[arg(long)]
    pub analytic_bounds: bool,

    /// Mutate and score candidates on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output directory for results
    #[arg(long, default_value = "schedule_output")]
    pub output: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

const CHAMPION_COUNT: usize = 5;

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run evolution command
///
/// 1. Load the league
/// 2. Build the evolution configuration
/// 3. Run the evolution loop
/// 4. Save and print results
pub fn run(args: EvolveArgs, seed: Option<u64>) -> Result<()> {
    let league = League::load_or_demo(args.league.as_deref())?;
    let config = build_evolution_config(&args, &league)?;
    let mut rng = create_rng(seed);

    tracing::info!(
        "Starting evolution: teams={}, pop={}, gen={}, target={}",
        league.team_count(),
        config.population_size,
        config.max_generations,
        config.target_fitness
    );

    let result = run_evolution(&league, &config, &mut rng)?;

    save_results(&result, &args)?;
    print_summary(&result, &league, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build evolution configuration from command arguments
fn build_evolution_config(args: &EvolveArgs, league: &League) -> Result<EvolutionConfig> {
    let config = EvolutionConfig {
        population_size: args.population,
        max_generations: args.generations,
        target_fitness: args.target,
        max_attempts: args.max_attempts,
        mutation: MutationConfig {
            swap_probability: args.swap_probability,
        },
        ..Default::default()
    }
    .with_fitness(league.fitness_config(args.analytic_bounds)?)
    .with_parallel(args.parallel);

    config.validate().context("Invalid evolution settings")?;
    Ok(config)
}

/// Run the evolution loop with progress callback
fn run_evolution(
    league: &League,
    config: &EvolutionConfig,
    rng: &mut ChaCha8Rng,
) -> Result<EvolutionResult> {
    let distances = league.padded_distances()?;

    let callback = |stats: &GenerationStats| {
        let b = &stats.best_breakdown;
        tracing::info!(
            "Generation {}: best={:.4}, avg={:.4} (alt={:.3} sep={:.3} dist={:.3} city={:.3})",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            b.alternation,
            b.separation,
            b.distance,
            b.city_penalty
        );
        if stats.build.underflowed() {
            tracing::warn!(
                "Generation {}: {} of {} fresh schedules were duplicates",
                stats.generation,
                stats.build.duplicated,
                stats.build.duplicated + stats.build.generated
            );
        }
    };

    let result = evolve_with_callback(league.team_count(), &distances, config, callback, rng)
        .context("Evolution failed")?;

    log_breakdown("Best schedule", &result.breakdown);
    Ok(result)
}

/// Save evolution results to output directory
fn save_results(result: &EvolutionResult, args: &EvolveArgs) -> Result<()> {
    create_output_directory(&args.output)?;
    save_best(&result.best.schedule, &args.output)?;
    save_champions(result, &args.output)?;
    save_fitness_history(result, &args.output)?;

    if args.json {
        print_json_results(result)?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn create_output_directory(output: &Path) -> Result<()> {
    std::fs::create_dir_all(output.join("champions")).context("Failed to create output directory")?;
    Ok(())
}

fn save_best(schedule: &Schedule, output: &Path) -> Result<()> {
    let path = output.join("best_schedule.json");
    schedule.save(&path).context("Failed to save best schedule")?;
    tracing::info!("Saved best schedule to {}", path.display());
    Ok(())
}

/// Save the top schedules of the final population
fn save_champions(result: &EvolutionResult, output: &Path) -> Result<()> {
    let champions_dir = output.join("champions");

    for (rank, idx) in select_elite(&result.population, CHAMPION_COUNT).into_iter().enumerate() {
        let path = champions_dir.join(format!("champion_{}.json", rank + 1));
        result.population[idx]
            .schedule
            .save(&path)
            .context("Failed to save champion")?;
        tracing::debug!("Saved champion {} to {}", rank + 1, path.display());
    }

    Ok(())
}

/// Save fitness history to CSV
fn save_fitness_history(result: &EvolutionResult, output: &Path) -> Result<()> {
    let path = output.join("fitness_history.csv");
    std::fs::write(&path, fitness_history_csv(result)).context("Failed to write fitness history")?;
    tracing::info!("Saved fitness history to {}", path.display());
    Ok(())
}

/// Print JSON results to stdout
fn print_json_results(result: &EvolutionResult) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        best_fitness: f64,
        initial_best_fitness: f64,
        generations_run: usize,
        reached_target: bool,
        breakdown: &'a league_core::ScoreBreakdown,
        schedule: &'a Schedule,
    }

    let output = JsonOutput {
        best_fitness: result.best.fitness,
        initial_best_fitness: result.initial_best_fitness,
        generations_run: result.generations_run,
        reached_target: result.reached_target,
        breakdown: &result.breakdown,
        schedule: &result.best.schedule,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print summary to console
fn print_summary(result: &EvolutionResult, league: &League, args: &EvolveArgs) {
    if args.json {
        return;
    }

    println!("\n=== Evolution Complete ===");
    println!("Generations: {}", result.generations_run);
    println!(
        "Best fitness: {:.4} (initial {:.4}, target {}reached)",
        result.best.fitness,
        result.initial_best_fitness,
        if result.reached_target { "" } else { "not " }
    );
    println!(
        "Generator: {} attempts, {} failures, {} duplicated slots",
        result.build_totals.attempts, result.build_totals.failures, result.build_totals.duplicated
    );
    println!("Output directory: {}", args.output.display());

    println!("\n{}", format_breakdown(&result.breakdown));
    println!("{}", result.best.schedule);
    print!("{}", format_matchdays(&result.best.schedule, |id| league.team_name(id)));
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn fitness_history_csv(result: &EvolutionResult) -> String {
    let mut content = String::from("generation,best_fitness,mean_fitness\n");
    for (i, (best, mean)) in result
        .best_fitness_history
        .iter()
        .zip(&result.mean_fitness_history)
        .enumerate()
    {
        content.push_str(&format!("{},{:.4},{:.4}\n", i + 1, best, mean));
    }
    content
}

// ============================================================================
// TESTS
// ============================================================================
