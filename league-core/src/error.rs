//! Error types shared across the workspace

use crate::schedule::{Matchday, TeamId};

/// Failure to build a schedule by constraint propagation.
///
/// Retried by the population builder; never fatal on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("cannot schedule a league with no teams")]
    NoTeams,

    #[error("no matchday left for team {home} hosting team {away}")]
    ConstraintExhaustion { home: TeamId, away: TeamId },
}

/// A schedule matrix that breaks a double round-robin invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureViolation {
    #[error("a schedule needs at least 2 teams, got {teams}")]
    TooFewTeams { teams: usize },

    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("team {team} has matchday {label} on the diagonal")]
    DiagonalUsed { team: TeamId, label: Matchday },

    #[error("fixture {home} vs {away} has matchday {label}, outside 1..={max}")]
    LabelOutOfRange { home: TeamId, away: TeamId, label: Matchday, max: Matchday },

    #[error("team {team} has no fixture on matchday {matchday}")]
    MissingFixture { team: TeamId, matchday: Matchday },

    #[error("team {team} has {count} fixtures on matchday {matchday}")]
    DoubleBooked { team: TeamId, matchday: Matchday, count: usize },

    #[error("legs of {first} vs {second} are on matchdays {a} and {b}, expected {expected} apart")]
    LegOffset { first: TeamId, second: TeamId, a: Matchday, b: Matchday, expected: Matchday },
}

/// Invalid run configuration. Fatal, reported before any work starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("team count must be positive")]
    NoTeams,

    #[error("population size must be positive")]
    EmptyPopulation,

    #[error("generation cap must be positive")]
    NoGenerations,

    #[error("attempt budget must be positive")]
    NoAttempts,

    #[error("distance matrix is empty")]
    EmptyDistances,

    #[error("distance matrix row {row} has {len} entries, expected {expected}")]
    NonSquareDistances { row: usize, len: usize, expected: usize },

    #[error("distance from {from} to {to} is {value}, expected a finite non-negative number")]
    InvalidDistance { from: usize, to: usize, value: f64 },

    #[error("distance matrix is {size}x{size} but the league has {teams} teams")]
    DistanceSizeMismatch { teams: usize, size: usize },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("target fitness must be finite, got {0}")]
    InvalidTarget(f64),

    #[error("weight for {metric} must be finite and non-negative, got {value}")]
    InvalidWeight { metric: &'static str, value: f64 },

    #[error("normalization range for {metric} must be finite, got worst={worst} best={best}")]
    InvalidRange { metric: &'static str, worst: f64, best: f64 },
}
