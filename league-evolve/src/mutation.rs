//! Mutation operator for schedules
//!
//! A mutation is a series of global relabelings: two matchdays trade places
//! everywhere in the matrix. A relabeling is a bijection on matchdays, so
//! every team still plays exactly once per matchday. The fixed gap between
//! first and return legs is not kept, which is what lets separation evolve.

use league_core::{Matchday, Schedule};
use rand::Rng;

/// Chance that each team index triggers one label swap
pub const DEFAULT_SWAP_PROBABILITY: f64 = 0.8;

/// Configuration for mutation
#[derive(Clone, Debug, PartialEq)]
pub struct MutationConfig {
    /// Per-team probability of swapping two matchdays
    pub swap_probability: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            swap_probability: DEFAULT_SWAP_PROBABILITY,
        }
    }
}

/// Return a mutated copy of `schedule`.
///
/// For each of the `N` team indices, with probability `swap_probability`,
/// two distinct matchdays are drawn uniformly and swapped across the whole
/// matrix.
pub fn mutate_schedule<R: Rng>(
    schedule: &Schedule,
    config: &MutationConfig,
    rng: &mut R,
) -> Schedule {
    let mut result = schedule.clone();
    let matchdays = result.matchdays() as Matchday;

    for _ in 0..result.teams() {
        if rng.gen::<f64>() < config.swap_probability {
            let (a, b) = draw_distinct_matchdays(matchdays, rng);
            result.swap_labels(a, b);
        }
    }

    result
}

/// Two different matchdays in `1..=matchdays`; the second draw repeats until
/// it differs from the first
fn draw_distinct_matchdays<R: Rng>(matchdays: Matchday, rng: &mut R) -> (Matchday, Matchday) {
    let a = rng.gen_range(1..=matchdays);
    let mut b = rng.gen_range(1..=matchdays);
    while a == b {
        b = rng.gen_range(1..=matchdays);
    }
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::generate_schedule;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn valid_schedule(teams: usize, rng: &mut ChaCha8Rng) -> Schedule {
        loop {
            if let Ok(schedule) = generate_schedule(teams, rng) {
                return schedule;
            }
        }
    }

    #[test]
    fn test_mutation_preserves_coverage() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = MutationConfig::default();

        for teams in [4, 6, 8] {
            let mut schedule = valid_schedule(teams, &mut rng);
            for _ in 0..100 {
                schedule = mutate_schedule(&schedule, &config, &mut rng);
                assert_eq!(schedule.check_coverage(), Ok(()));
            }
        }
    }

    #[test]
    fn test_mutation_leaves_original_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let original = valid_schedule(6, &mut rng);
        let snapshot = original.clone();

        let _ = mutate_schedule(&original, &MutationConfig::default(), &mut rng);

        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let schedule = valid_schedule(6, &mut rng);
        let config = MutationConfig { swap_probability: 0.0 };

        for _ in 0..20 {
            assert_eq!(mutate_schedule(&schedule, &config, &mut rng), schedule);
        }
    }

    #[test]
    fn test_certain_mutation_changes_schedule() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let schedule = valid_schedule(6, &mut rng);
        let config = MutationConfig { swap_probability: 1.0 };

        // Six swaps composed can cancel out, but not every time
        let changed = (0..20)
            .filter(|_| mutate_schedule(&schedule, &config, &mut rng) != schedule)
            .count();
        assert!(changed > 0);
    }

    #[test]
    fn test_distinct_draws() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let (a, b) = draw_distinct_matchdays(2, &mut rng);
            assert_ne!(a, b);
            assert!((1..=2).contains(&a) && (1..=2).contains(&b));
        }
    }
}
