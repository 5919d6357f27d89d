//! Console formatting for schedules and scores

use league_core::{Matchday, Schedule, ScoreBreakdown, TeamId};

/// Fixture list, one block per matchday, home team first
pub fn format_matchdays<'a, F>(schedule: &Schedule, team_name: F) -> String
where
    F: Fn(TeamId) -> &'a str,
{
    let mut out = String::new();
    for matchday in 1..=schedule.matchdays() as Matchday {
        out.push_str(&format!("Matchday {}\n", matchday));
        for (home, away) in schedule.fixtures_on(matchday) {
            out.push_str(&format!("  {} vs {}\n", team_name(home), team_name(away)));
        }
    }
    out
}

/// Raw and normalized metrics as an aligned table
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let raw = &breakdown.raw;
    let rows = [
        ("Alternation", raw.alternation as f64, breakdown.alternation),
        ("Separation", raw.separation as f64, breakdown.separation),
        ("Distance", raw.distance, breakdown.distance),
        ("City penalty", raw.city_penalty as f64, breakdown.city_penalty),
    ];

    let mut out = format!("{:<14}{:>12}{:>12}\n", "Metric", "Raw", "Normalized");
    for (name, raw, normalized) in rows {
        out.push_str(&format!("{:<14}{:>12.1}{:>12.4}\n", name, raw, normalized));
    }
    out.push_str(&format!("{:<14}{:>24.4}\n", "Fitness", breakdown.fitness));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::{evaluate, DistanceMatrix, FitnessConfig};

    fn four_team_schedule() -> Schedule {
        Schedule::from_rows(vec![
            vec![0, 1, 2, 3],
            vec![4, 0, 3, 2],
            vec![5, 6, 0, 1],
            vec![6, 5, 4, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_format_matchdays_lists_every_fixture() {
        let names = ["A", "B", "C", "D"];
        let text = format_matchdays(&four_team_schedule(), |id| names[id]);

        assert_eq!(text.matches("Matchday").count(), 6);
        assert_eq!(text.matches(" vs ").count(), 12);
        assert!(text.starts_with("Matchday 1\n  A vs B\n  C vs D\n"));
    }

    #[test]
    fn test_format_breakdown_has_all_metrics() {
        let distances = DistanceMatrix::uniform(4, 1.0).unwrap();
        let breakdown = evaluate(&four_team_schedule(), &distances, &FitnessConfig::default());
        let text = format_breakdown(&breakdown);

        for label in ["Alternation", "Separation", "Distance", "City penalty", "Fitness"] {
            assert!(text.contains(label), "missing {}", label);
        }
    }
}
