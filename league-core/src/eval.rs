//! Schedule evaluation
//!
//! Four raw metrics are computed over the whole season, rescaled against a
//! reference range and combined into one composite (higher = better):
//!
//! - alternation: consecutive home or consecutive away matchdays (lower is better)
//! - separation: matchdays between the two legs of each pairing (higher is better)
//! - distance: travel along each team's season (lower is better)
//! - city penalty: shared-stadium teams both at home on a matchday (lower is better)

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::ConfigError;
use crate::schedule::{Matchday, Schedule};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Reference range used to rescale one raw metric.
///
/// `worst` maps to 0 and `best` maps to 1; values outside the range fall
/// outside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub worst: f64,
    pub best: f64,
}

impl MetricRange {
    pub const fn new(worst: f64, best: f64) -> Self {
        Self { worst, best }
    }

    /// Rescale a raw value. A zero-width range scores every value as 1.
    pub fn normalize(&self, raw: f64) -> f64 {
        let spread = self.worst - self.best;
        if spread == 0.0 {
            return 1.0;
        }
        (self.worst - raw) / spread
    }

    fn validate(&self, metric: &'static str) -> Result<(), ConfigError> {
        if self.worst.is_finite() && self.best.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange { metric, worst: self.worst, best: self.best })
        }
    }
}

/// Reference ranges for all four metrics
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub alternation: MetricRange,
    pub separation: MetricRange,
    pub distance: MetricRange,
    pub city_penalty: MetricRange,
}

impl Default for Normalization {
    /// Calibrated against the 12-team demonstration league
    fn default() -> Self {
        Self {
            alternation: MetricRange::new(180.0, 70.0),
            separation: MetricRange::new(350.0, 1000.0),
            distance: MetricRange::new(60_000.0, 36_000.0),
            city_penalty: MetricRange::new(60.0, 40.0),
        }
    }
}

impl Normalization {
    /// Bounds that every schedule over `distances.size()` teams respects.
    ///
    /// Each normalized term then lies in `[0, 1]`. The ranges are loose, so
    /// good schedules score well below 1 on alternation and distance.
    pub fn analytic(distances: &DistanceMatrix) -> Self {
        let n = distances.size().max(2) as f64;
        let transitions = 2.0 * n - 3.0;
        let pairs = n * (n - 1.0) / 2.0;
        let sharing = distances.shared_stadium_pairs().len() as f64;

        Self {
            alternation: MetricRange::new(n * transitions, 0.0),
            separation: MetricRange::new(pairs, pairs * transitions),
            distance: MetricRange::new((n * transitions * distances.max_distance()).max(1.0), 0.0),
            city_penalty: MetricRange::new((sharing * (n - 1.0)).max(1.0), 0.0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.alternation.validate("alternation")?;
        self.separation.validate("separation")?;
        self.distance.validate("distance")?;
        self.city_penalty.validate("city penalty")
    }
}

/// Composite weights
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub alternation: f64,
    pub separation: f64,
    pub distance: f64,
    pub city_penalty: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            alternation: 0.25,
            separation: 0.25,
            distance: 0.25,
            city_penalty: 0.25,
        }
    }
}

impl Weights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (metric, value) in [
            ("alternation", self.alternation),
            ("separation", self.separation),
            ("distance", self.distance),
            ("city penalty", self.city_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { metric, value });
            }
        }
        Ok(())
    }
}

/// Everything the evaluator needs besides the schedule and distances
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    pub weights: Weights,
    pub normalization: Normalization,
}

impl FitnessConfig {
    /// Use custom reference ranges
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Use custom weights
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.normalization.validate()
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Raw metric values before rescaling
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    pub alternation: u32,
    pub separation: u32,
    pub distance: f64,
    pub city_penalty: u32,
}

/// Normalized metrics and the weighted composite
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub raw: RawScores,
    pub alternation: f64,
    pub separation: f64,
    pub distance: f64,
    pub city_penalty: f64,
    pub fitness: f64,
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alternation={:.4} separation={:.4} distance={:.4} city_penalty={:.4} fitness={:.4}",
            self.alternation, self.separation, self.distance, self.city_penalty, self.fitness
        )
    }
}

/// A schedule paired with its composite fitness
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub schedule: Schedule,
    pub fitness: f64,
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Score a schedule. Pure: the same inputs always give the same breakdown.
///
/// `distances` must have the schedule's (padded) size.
pub fn evaluate(
    schedule: &Schedule,
    distances: &DistanceMatrix,
    config: &FitnessConfig,
) -> ScoreBreakdown {
    debug_assert_eq!(schedule.teams(), distances.size());

    let raw = RawScores {
        alternation: alternation_cost(schedule),
        separation: separation_score(schedule),
        distance: travel_distance(schedule, distances),
        city_penalty: shared_stadium_penalty(schedule, distances),
    };

    let norm = &config.normalization;
    let alternation = norm.alternation.normalize(raw.alternation as f64);
    let separation = norm.separation.normalize(raw.separation as f64);
    let distance = norm.distance.normalize(raw.distance);
    let city_penalty = norm.city_penalty.normalize(raw.city_penalty as f64);

    let w = &config.weights;
    let fitness = w.alternation * alternation
        + w.separation * separation
        + w.distance * distance
        + w.city_penalty * city_penalty;

    ScoreBreakdown {
        raw,
        alternation,
        separation,
        distance,
        city_penalty,
        fitness,
    }
}

/// Score a schedule and wrap it as a candidate
pub fn evaluate_candidate(
    schedule: Schedule,
    distances: &DistanceMatrix,
    config: &FitnessConfig,
) -> Candidate {
    let fitness = evaluate(&schedule, distances, config).fitness;
    Candidate { schedule, fitness }
}

/// Report a breakdown through the log
pub fn log_breakdown(label: &str, breakdown: &ScoreBreakdown) {
    tracing::info!(
        alternation = breakdown.alternation,
        separation = breakdown.separation,
        distance = breakdown.distance,
        city_penalty = breakdown.city_penalty,
        "{}: fitness={:.4}",
        label,
        breakdown.fitness
    );
}

/// Count matchdays `k` where a team is home on both `k` and `k + 1`, or
/// away on both. Summed over all teams.
pub fn alternation_cost(schedule: &Schedule) -> u32 {
    let mut cost = 0;
    for team in 0..schedule.teams() {
        let calendar = schedule.calendar(team);
        for window in calendar.windows(2).skip(1) {
            if let (Some(now), Some(next)) = (window[0], window[1]) {
                if now.venue == next.venue {
                    cost += 1;
                }
            }
        }
    }
    cost
}

/// Sum of the matchday gaps between the two legs of every pairing
pub fn separation_score(schedule: &Schedule) -> u32 {
    let mut total = 0u32;
    for first in 0..schedule.teams() {
        for second in (first + 1)..schedule.teams() {
            let gap = schedule
                .home_label(first, second)
                .abs_diff(schedule.home_label(second, first));
            total += u32::from(gap);
        }
    }
    total
}

/// Travel accumulated between consecutive matchdays, over all teams.
///
/// Two home games in a row cost nothing. Any other transition costs the
/// distance between the venues of the two opponents faced; consecutive
/// away games are a road trip straight from one away venue to the next.
pub fn travel_distance(schedule: &Schedule, distances: &DistanceMatrix) -> f64 {
    let mut total = 0.0;
    for team in 0..schedule.teams() {
        let calendar = schedule.calendar(team);
        for window in calendar.windows(2).skip(1) {
            if let (Some(now), Some(next)) = (window[0], window[1]) {
                if now.is_home() && next.is_home() {
                    continue;
                }
                total += distances.get(now.opponent, next.opponent);
            }
        }
    }
    total
}

/// Matchdays on which two teams sharing a stadium are both at home,
/// summed over every ordered sharing pair
pub fn shared_stadium_penalty(schedule: &Schedule, distances: &DistanceMatrix) -> u32 {
    let mut penalty = 0;
    for (first, second) in distances.shared_stadium_pairs() {
        let home_days: FxHashSet<Matchday> = schedule.home_labels(first).collect();
        let clashes: FxHashSet<Matchday> = schedule
            .home_labels(second)
            .filter(|label| home_days.contains(label))
            .collect();
        penalty += clashes.len() as u32;
    }
    penalty
}
