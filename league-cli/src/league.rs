//! League definition: team names and venue distances
//!
//! Stored as JSON:
//!
//! ```json
//! { "teams": ["North United", "North City"], "distances": [[0, 0], [0, 0]] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use league_core::{padded_team_count, DistanceMatrix, FitnessConfig, Normalization, TeamId};

/// Teams and the distances between their venues
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct League {
    pub teams: Vec<String>,
    pub distances: DistanceMatrix,
}

impl League {
    /// Load and validate a league file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read league file {}", path.display()))?;
        let league: League = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse league file {}", path.display()))?;
        league.validate()?;
        Ok(league)
    }

    /// Load from `path`, or fall back to the demo league
    pub fn load_or_demo(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let league = Self::load(path)?;
                tracing::info!(
                    "Loaded league with {} teams from {}",
                    league.team_count(),
                    path.display()
                );
                Ok(league)
            }
            None => {
                tracing::info!("No league file given, using the 12-team demo league");
                Self::demo()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.teams.is_empty() {
            anyhow::bail!("League has no teams");
        }
        if self.distances.size() != self.teams.len() {
            anyhow::bail!(
                "League has {} teams but a {}x{} distance matrix",
                self.teams.len(),
                self.distances.size(),
                self.distances.size()
            );
        }
        Ok(())
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Team name, or "bye" for the padding team of an odd league
    pub fn team_name(&self, id: TeamId) -> &str {
        self.teams.get(id).map_or("bye", String::as_str)
    }

    /// Distances resized for the schedule (bye team added if odd)
    pub fn padded_distances(&self) -> Result<DistanceMatrix> {
        let padded = self
            .distances
            .padded_to(padded_team_count(self.team_count()))
            .context("Failed to pad distance matrix")?;
        Ok(padded)
    }

    /// Fitness configuration for this league
    ///
    /// `analytic` swaps the demo-calibrated ranges for bounds derived from
    /// the league size and distances.
    pub fn fitness_config(&self, analytic: bool) -> Result<FitnessConfig> {
        let config = FitnessConfig::default();
        if !analytic {
            return Ok(config);
        }
        let distances = self.padded_distances()?;
        Ok(config.with_normalization(Normalization::analytic(&distances)))
    }

    /// 12-team demonstration league.
    ///
    /// Three pairs of clubs share a stadium: teams 0/1, 4/5 and 9/10. The
    /// default normalization ranges were calibrated on this league.
    pub fn demo() -> Result<Self> {
        let teams = [
            "North United",
            "North City",
            "Harbor FC",
            "Lakeside",
            "Central Athletic",
            "Central Rovers",
            "Riverside",
            "Highland",
            "Valley Town",
            "Bay Wanderers",
            "Bay Albion",
            "Coast Rangers",
        ];
        let distances: [[f64; 12]; 12] = [
            [0.0, 0.0, 70.0, 140.0, 100.0, 100.0, 100.0, 300.0, 250.0, 250.0, 250.0, 400.0],
            [0.0, 0.0, 70.0, 140.0, 100.0, 100.0, 100.0, 300.0, 250.0, 250.0, 250.0, 400.0],
            [70.0, 70.0, 0.0, 70.0, 170.0, 170.0, 170.0, 370.0, 320.0, 320.0, 320.0, 470.0],
            [140.0, 140.0, 70.0, 0.0, 240.0, 240.0, 240.0, 440.0, 390.0, 390.0, 390.0, 540.0],
            [100.0, 100.0, 170.0, 240.0, 0.0, 0.0, 50.0, 200.0, 150.0, 150.0, 150.0, 300.0],
            [100.0, 100.0, 170.0, 240.0, 0.0, 0.0, 50.0, 200.0, 150.0, 150.0, 150.0, 300.0],
            [100.0, 100.0, 170.0, 240.0, 50.0, 50.0, 0.0, 250.0, 200.0, 200.0, 200.0, 350.0],
            [300.0, 300.0, 370.0, 440.0, 200.0, 200.0, 250.0, 0.0, 50.0, 300.0, 300.0, 100.0],
            [250.0, 250.0, 320.0, 390.0, 150.0, 150.0, 200.0, 50.0, 0.0, 300.0, 300.0, 150.0],
            [250.0, 250.0, 320.0, 390.0, 150.0, 150.0, 200.0, 300.0, 300.0, 0.0, 0.0, 200.0],
            [250.0, 250.0, 320.0, 390.0, 150.0, 150.0, 200.0, 300.0, 300.0, 0.0, 0.0, 200.0],
            [400.0, 400.0, 470.0, 540.0, 300.0, 300.0, 350.0, 100.0, 150.0, 200.0, 200.0, 0.0],
        ];

        let distances = DistanceMatrix::new(distances.iter().map(|row| row.to_vec()).collect())
            .context("Invalid demo distances")?;

        Ok(Self {
            teams: teams.iter().map(|name| name.to_string()).collect(),
            distances,
        })
    }
}

/// Placeholder names for a league without a file
pub fn numbered_team_names(teams: usize) -> Vec<String> {
    (1..=teams).map(|i| format!("Team {}", i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_league_is_consistent() {
        let league = League::demo().unwrap();
        assert!(league.validate().is_ok());
        assert_eq!(league.team_count(), 12);
        assert_eq!(
            league.distances.shared_stadium_pairs(),
            vec![(0, 1), (1, 0), (4, 5), (5, 4), (9, 10), (10, 9)]
        );
    }

    #[test]
    fn test_team_name_falls_back_to_bye() {
        let league = League {
            teams: numbered_team_names(3),
            distances: DistanceMatrix::uniform(3, 5.0).unwrap(),
        };
        assert_eq!(league.team_name(0), "Team 1");
        assert_eq!(league.team_name(3), "bye");
        assert_eq!(league.padded_distances().unwrap().size(), 4);
    }

    #[test]
    fn test_validate_rejects_mismatched_sizes() {
        let league = League {
            teams: numbered_team_names(3),
            distances: DistanceMatrix::uniform(4, 5.0).unwrap(),
        };
        assert!(league.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("league-test-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "teams": ["A", "B"], "distances": [[0, 12.5], [12.5, 0]] }"#,
        )
        .unwrap();

        let league = League::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(league.teams, vec!["A", "B"]);
        assert_eq!(league.distances.get(0, 1), 12.5);
    }

    #[test]
    fn test_load_rejects_negative_distance() {
        let path = std::env::temp_dir().join(format!("league-bad-{}.json", std::process::id()));
        let content = r#"{ "teams": ["A", "B"], "distances": [[0, -1], [1, 0]] }"#;
        std::fs::write(&path, content).unwrap();

        let result = League::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_analytic_fitness_config() {
        let league = League::demo().unwrap();
        let default = league.fitness_config(false).unwrap();
        let analytic = league.fitness_config(true).unwrap();
        assert_eq!(default, FitnessConfig::default());
        assert_ne!(analytic.normalization, default.normalization);
    }
}
