//! League Core - Schedule model and scoring
//!
//! This crate provides the core pieces of double round-robin scheduling:
//! - Schedule matrix with home/away accessors and structural checks
//! - Distance matrix with shared-stadium detection
//! - Randomized constraint-propagation schedule generator
//! - Four-criterion fitness evaluation

pub mod error;
pub mod schedule;
pub mod distance;
pub mod generator;
pub mod eval;

// Re-exports for convenient access
pub use error::{ConfigError, GenerationError, StructureViolation};
pub use schedule::{Fixture, Matchday, Schedule, TeamId, Venue};
pub use distance::DistanceMatrix;
pub use generator::{generate_schedule, padded_team_count};
pub use eval::{
    evaluate, evaluate_candidate, Candidate, FitnessConfig, MetricRange, Normalization,
    RawScores, ScoreBreakdown, Weights,
};
