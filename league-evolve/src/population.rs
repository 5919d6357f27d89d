//! Population building
//!
//! Calls the generator until enough schedules exist or the attempt budget
//! runs out. A short population is topped up by duplicating what was
//! generated, cycling from the front.

use league_core::{generate_schedule, padded_team_count, GenerationError, Schedule};
use rand::Rng;

/// Default generator attempt budget per build
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// What happened during one or more builds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Generator calls made
    pub attempts: usize,
    /// Schedules generated successfully
    pub generated: usize,
    /// Generator calls that exhausted their constraints
    pub failures: usize,
    /// Slots filled by duplicating generated schedules
    pub duplicated: usize,
}

impl BuildReport {
    /// The build fell short and had to duplicate
    pub fn underflowed(&self) -> bool {
        self.duplicated > 0
    }

    /// Accumulate another report into this one
    pub fn absorb(&mut self, other: &BuildReport) {
        self.attempts += other.attempts;
        self.generated += other.generated;
        self.failures += other.failures;
        self.duplicated += other.duplicated;
    }
}

/// Builds batches of unscored schedules for one league size
#[derive(Clone, Debug)]
pub struct PopulationBuilder {
    teams: usize,
    max_attempts: usize,
}

impl PopulationBuilder {
    pub fn new(teams: usize) -> Self {
        Self {
            teams,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the generator attempt budget per build
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Team count of the schedules produced (after bye padding)
    pub fn team_count(&self) -> usize {
        padded_team_count(self.teams)
    }

    /// Build `size` schedules.
    ///
    /// Returns fewer than `size` only when not a single schedule could be
    /// generated within the budget, in which case the vector is empty.
    pub fn build<R: Rng>(&self, size: usize, rng: &mut R) -> (Vec<Schedule>, BuildReport) {
        let mut schedules = Vec::with_capacity(size);
        let mut report = BuildReport::default();

        while schedules.len() < size && report.attempts < self.max_attempts {
            report.attempts += 1;
            match generate_schedule(self.teams, rng) {
                Ok(schedule) => schedules.push(schedule),
                Err(GenerationError::NoTeams) => break,
                Err(e) => {
                    report.failures += 1;
                    tracing::trace!("generation attempt {} failed: {}", report.attempts, e);
                }
            }
        }
        report.generated = schedules.len();

        if schedules.len() < size {
            fill_by_duplication(&mut schedules, size, &mut report);
        }

        tracing::debug!(
            "built {} schedules ({} attempts, {} failures, {} duplicated)",
            schedules.len(),
            report.attempts,
            report.failures,
            report.duplicated
        );

        (schedules, report)
    }
}

/// Top up to `size` by cloning from the front, cyclically
fn fill_by_duplication(schedules: &mut Vec<Schedule>, size: usize, report: &mut BuildReport) {
    let generated = schedules.len();
    if generated == 0 {
        tracing::warn!(
            "no valid schedule generated in {} attempts, population is empty",
            report.attempts
        );
        return;
    }

    let missing = size - generated;
    for i in 0..missing {
        let clone = schedules[i % generated].clone();
        schedules.push(clone);
    }
    report.duplicated = missing;

    tracing::warn!(
        "population underflow: generated {} of {} schedules, duplicated {}",
        generated,
        size,
        missing
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_build_reaches_requested_size() {
        let builder = PopulationBuilder::new(6).with_max_attempts(100_000);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let (schedules, report) = builder.build(20, &mut rng);

        assert_eq!(schedules.len(), 20);
        assert_eq!(report.generated, 20);
        assert_eq!(report.duplicated, 0);
        assert_eq!(report.attempts, report.generated + report.failures);
        assert!(schedules.iter().all(Schedule::is_valid));
    }

    #[test]
    fn test_four_teams_never_fails() {
        let builder = PopulationBuilder::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let (schedules, report) = builder.build(30, &mut rng);

        assert_eq!(schedules.len(), 30);
        assert_eq!(report.attempts, 30);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn test_underflow_duplicates_cyclically() {
        // Four teams always succeed, so a budget of 3 yields exactly 3 originals
        let builder = PopulationBuilder::new(4).with_max_attempts(3);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let (schedules, report) = builder.build(8, &mut rng);

        assert_eq!(schedules.len(), 8);
        assert_eq!(report.generated, 3);
        assert_eq!(report.duplicated, 5);
        assert!(report.underflowed());
        for i in 3..8 {
            assert_eq!(schedules[i], schedules[(i - 3) % 3]);
        }
    }

    #[test]
    fn test_no_teams_yields_empty_population() {
        let builder = PopulationBuilder::new(0).with_max_attempts(10);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let (schedules, report) = builder.build(4, &mut rng);

        assert!(schedules.is_empty());
        assert_eq!(report.attempts, 1);
        assert_eq!(report.duplicated, 0);
    }

    #[test]
    fn test_odd_league_builds_padded_schedules() {
        let builder = PopulationBuilder::new(5).with_max_attempts(100_000);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let (schedules, _) = builder.build(5, &mut rng);

        assert_eq!(builder.team_count(), 6);
        assert!(schedules.iter().all(|s| s.teams() == 6 && s.is_valid()));
    }

    #[test]
    fn test_report_absorb() {
        let mut total = BuildReport::default();
        total.absorb(&BuildReport { attempts: 4, generated: 2, failures: 2, duplicated: 1 });
        total.absorb(&BuildReport { attempts: 1, generated: 1, failures: 0, duplicated: 0 });
        assert_eq!(total, BuildReport { attempts: 5, generated: 3, failures: 2, duplicated: 1 });
    }
}
