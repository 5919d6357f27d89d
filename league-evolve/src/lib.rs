//! League Evolution - Genetic search over double round-robin schedules
//!
//! This crate provides the evolutionary engine:
//! - Population building with retry budget and duplication fallback
//! - Label-swap mutation
//! - Fitness ranking
//! - Generational replace-and-rank loop

pub mod engine;
pub mod mutation;
pub mod population;
pub mod selection;

pub use engine::{
    evolve, evolve_with_callback, EvolutionConfig, EvolutionResult, EvolveError, GenerationStats,
};
pub use mutation::{mutate_schedule, MutationConfig, DEFAULT_SWAP_PROBABILITY};
pub use population::{BuildReport, PopulationBuilder, DEFAULT_MAX_ATTEMPTS};
pub use selection::{best_candidate, mean_fitness, rank_population, select_elite};
