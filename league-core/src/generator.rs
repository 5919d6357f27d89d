//! Random double round-robin generation by constraint propagation
//!
//! Each team keeps the set of first-leg matchdays (`1..N`) it still has
//! free. Pairs are visited column by column; each pair draws a matchday
//! free for both teams, and its return leg lands exactly `N - 1` matchdays
//! later. The greedy draw can paint itself into a corner, in which case
//! generation fails and the caller retries.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::error::GenerationError;
use crate::schedule::{Matchday, Schedule};

/// Team count after adding a bye team to odd leagues
pub fn padded_team_count(teams: usize) -> usize {
    if teams % 2 == 1 {
        teams + 1
    } else {
        teams
    }
}

/// Generate one schedule for `teams` teams (padded to an even count).
///
/// Returns [`GenerationError::ConstraintExhaustion`] as soon as some pair
/// has no matchday free for both teams.
pub fn generate_schedule<R: Rng>(teams: usize, rng: &mut R) -> Result<Schedule, GenerationError> {
    if teams == 0 {
        return Err(GenerationError::NoTeams);
    }

    let n = padded_team_count(teams);
    let offset = (n - 1) as Matchday;

    let mut available: Vec<FxHashSet<Matchday>> =
        (0..n).map(|_| (1..=offset).collect()).collect();
    let mut schedule = Schedule::empty(n);

    for away in 0..n {
        for home in (away + 1)..n {
            let mut candidates: Vec<Matchday> = available[home]
                .intersection(&available[away])
                .copied()
                .collect();
            // Hash iteration order is not part of the contract
            candidates.sort_unstable();

            let &label = candidates
                .choose(rng)
                .ok_or(GenerationError::ConstraintExhaustion { home, away })?;

            available[home].remove(&label);
            available[away].remove(&label);

            schedule.set(home, away, label);
            schedule.set(away, home, label + offset);
        }
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Keep drawing until the generator succeeds
    fn generate_until_valid(teams: usize, rng: &mut ChaCha8Rng) -> Schedule {
        for _ in 0..10_000 {
            if let Ok(schedule) = generate_schedule(teams, rng) {
                return schedule;
            }
        }
        panic!("no schedule for {} teams in 10000 attempts", teams);
    }

    #[test]
    fn test_padded_team_count() {
        assert_eq!(padded_team_count(4), 4);
        assert_eq!(padded_team_count(5), 6);
        assert_eq!(padded_team_count(1), 2);
    }

    #[test]
    fn test_no_teams_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(generate_schedule(0, &mut rng), Err(GenerationError::NoTeams));
    }

    #[test]
    fn test_four_teams_never_exhausts() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let schedule = generate_schedule(4, &mut rng).unwrap();
            assert_eq!(schedule.check_coverage(), Ok(()));
            assert_eq!(schedule.check_leg_offset(), Ok(()));
        }
    }

    #[test]
    fn test_every_success_is_structurally_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for teams in [2, 4, 6, 8] {
            let mut successes = 0;
            for _ in 0..500 {
                match generate_schedule(teams, &mut rng) {
                    Ok(schedule) => {
                        successes += 1;
                        assert_eq!(schedule.teams(), teams);
                        assert_eq!(schedule.check_coverage(), Ok(()));
                        assert_eq!(schedule.check_leg_offset(), Ok(()));
                    }
                    Err(e) => assert!(matches!(e, GenerationError::ConstraintExhaustion { .. })),
                }
            }
            assert!(successes > 0, "no successes for {} teams", teams);
        }
    }

    #[test]
    fn test_demo_sized_leagues_are_structurally_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for teams in [10, 12] {
            let mut successes = 0;
            for _ in 0..20_000 {
                match generate_schedule(teams, &mut rng) {
                    Ok(schedule) => {
                        successes += 1;
                        assert_eq!(schedule.teams(), teams);
                        assert_eq!(schedule.check_coverage(), Ok(()));
                        assert_eq!(schedule.check_leg_offset(), Ok(()));
                    }
                    Err(e) => assert!(matches!(e, GenerationError::ConstraintExhaustion { .. })),
                }
            }
            assert!(successes > 0, "no successes for {} teams", teams);
        }
    }

    #[test]
    fn test_large_leagues_exhaust_without_panicking() {
        // The greedy fill practically never completes from 20 teams up
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for teams in [20, 24, 30] {
            for _ in 0..100 {
                let result = generate_schedule(teams, &mut rng);
                assert!(
                    matches!(result, Err(GenerationError::ConstraintExhaustion { .. })),
                    "{} teams: {:?}",
                    teams,
                    result.map(|s| s.teams())
                );
            }
        }
    }

    #[test]
    fn test_first_legs_below_return_legs() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let schedule = generate_until_valid(6, &mut rng);
        for home in 0..6 {
            for away in 0..home {
                let first = schedule.home_label(home, away);
                let second = schedule.home_label(away, home);
                assert!((1..=5).contains(&first));
                assert_eq!(second, first + 5);
            }
        }
    }

    #[test]
    fn test_odd_league_is_padded() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let schedule = generate_until_valid(5, &mut rng);
        assert_eq!(schedule.teams(), 6);
        assert_eq!(schedule.matchdays(), 10);
        assert_eq!(schedule.check_coverage(), Ok(()));
        assert_eq!(schedule.check_leg_offset(), Ok(()));
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(generate_schedule(6, &mut a), generate_schedule(6, &mut b));
        }
    }
}
