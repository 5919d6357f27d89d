//! Schedule matrix
//!
//! A schedule for `N` teams is an `N x N` table of matchdays. The same cell
//! array answers both "who plays whom" and "on what day":
//!
//! - `S[i][j]` is the matchday on which team `i` **hosts** team `j`
//! - row `i` therefore lists `i`'s home fixtures, column `i` its away fixtures
//! - the diagonal is unused and holds [`UNUSED`]
//!
//! Matchdays run from 1 to `2N - 2`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StructureViolation;

/// Matchday label (1-based, 0 = unused)
pub type Matchday = u16;

/// Team index into the schedule and distance matrices
pub type TeamId = usize;

/// Diagonal sentinel
pub const UNUSED: Matchday = 0;

/// Where a team plays a fixture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

/// One team's fixture on a given matchday
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub opponent: TeamId,
    pub venue: Venue,
}

impl Fixture {
    pub fn is_home(&self) -> bool {
        self.venue == Venue::Home
    }
}

/// Double round-robin schedule matrix, stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Matchday>>", into = "Vec<Vec<Matchday>>")]
pub struct Schedule {
    teams: usize,
    cells: Vec<Matchday>,
}

impl Schedule {
    /// All-unused matrix for `teams` teams
    pub(crate) fn empty(teams: usize) -> Self {
        Self {
            teams,
            cells: vec![UNUSED; teams * teams],
        }
    }

    /// Build from explicit rows.
    ///
    /// Checks shape, the diagonal and label range. Coverage is not checked
    /// here; call [`Schedule::check_coverage`] for that.
    pub fn from_rows(rows: Vec<Vec<Matchday>>) -> Result<Self, StructureViolation> {
        let teams = rows.len();
        if teams < 2 {
            return Err(StructureViolation::TooFewTeams { teams });
        }
        let max = (2 * teams - 2) as Matchday;

        let mut cells = Vec::with_capacity(teams * teams);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != teams {
                return Err(StructureViolation::NotSquare {
                    row,
                    len: values.len(),
                    expected: teams,
                });
            }
            for (col, &label) in values.iter().enumerate() {
                if row == col {
                    if label != UNUSED {
                        return Err(StructureViolation::DiagonalUsed { team: row, label });
                    }
                } else if label == UNUSED || label > max {
                    return Err(StructureViolation::LabelOutOfRange {
                        home: row,
                        away: col,
                        label,
                        max,
                    });
                }
            }
            cells.extend(values);
        }

        Ok(Self { teams, cells })
    }

    /// Number of teams (rows)
    pub fn teams(&self) -> usize {
        self.teams
    }

    /// Number of matchdays in the season (`2N - 2`)
    pub fn matchdays(&self) -> usize {
        2 * self.teams - 2
    }

    /// Matchday on which `home` hosts `away`
    pub fn home_label(&self, home: TeamId, away: TeamId) -> Matchday {
        self.cells[home * self.teams + away]
    }

    /// Matchday on which `team` visits `host`
    pub fn away_label(&self, team: TeamId, host: TeamId) -> Matchday {
        self.cells[host * self.teams + team]
    }

    pub(crate) fn set(&mut self, home: TeamId, away: TeamId, label: Matchday) {
        self.cells[home * self.teams + away] = label;
    }

    /// Matchdays of `team`'s home fixtures (its row, diagonal skipped)
    pub fn home_labels(&self, team: TeamId) -> impl Iterator<Item = Matchday> + '_ {
        (0..self.teams)
            .filter(move |&other| other != team)
            .map(move |other| self.home_label(team, other))
    }

    /// Matchdays of `team`'s away fixtures (its column, diagonal skipped)
    pub fn away_labels(&self, team: TeamId) -> impl Iterator<Item = Matchday> + '_ {
        (0..self.teams)
            .filter(move |&other| other != team)
            .map(move |other| self.away_label(team, other))
    }

    /// Per-matchday view of one team's season.
    ///
    /// Indexed by matchday; index 0 and index `matchdays() + 1` are always
    /// `None` so callers can look one matchday ahead without bounds checks.
    pub fn calendar(&self, team: TeamId) -> Vec<Option<Fixture>> {
        let mut calendar = vec![None; self.matchdays() + 2];
        for other in (0..self.teams).filter(|&other| other != team) {
            let home = self.home_label(team, other) as usize;
            let away = self.away_label(team, other) as usize;
            if let Some(slot) = calendar.get_mut(home) {
                *slot = Some(Fixture { opponent: other, venue: Venue::Home });
            }
            if let Some(slot) = calendar.get_mut(away) {
                *slot = Some(Fixture { opponent: other, venue: Venue::Away });
            }
        }
        calendar
    }

    /// `(home, away)` pairs playing on `matchday`
    pub fn fixtures_on(&self, matchday: Matchday) -> Vec<(TeamId, TeamId)> {
        let mut fixtures = Vec::with_capacity(self.teams / 2);
        for home in 0..self.teams {
            for away in 0..self.teams {
                if home != away && self.home_label(home, away) == matchday {
                    fixtures.push((home, away));
                }
            }
        }
        fixtures
    }

    /// Exchange two matchday labels everywhere in the matrix
    pub fn swap_labels(&mut self, a: Matchday, b: Matchday) {
        for cell in self.cells.iter_mut() {
            if *cell == a {
                *cell = b;
            } else if *cell == b {
                *cell = a;
            }
        }
    }

    /// Every team plays exactly one fixture on every matchday.
    ///
    /// This implies that the fixtures of any matchday form a perfect
    /// matching over the teams, and that the two legs of a pairing never
    /// share a matchday.
    pub fn check_coverage(&self) -> Result<(), StructureViolation> {
        let max = self.matchdays() as Matchday;

        for team in 0..self.teams {
            let label = self.home_label(team, team);
            if label != UNUSED {
                return Err(StructureViolation::DiagonalUsed { team, label });
            }

            let mut counts = vec![0usize; self.matchdays() + 1];
            for other in (0..self.teams).filter(|&other| other != team) {
                for (home, away) in [(team, other), (other, team)] {
                    let label = self.home_label(home, away);
                    if label == UNUSED || label > max {
                        return Err(StructureViolation::LabelOutOfRange { home, away, label, max });
                    }
                    counts[label as usize] += 1;
                }
            }

            for (matchday, &count) in counts.iter().enumerate().skip(1) {
                match count {
                    1 => {}
                    0 => {
                        return Err(StructureViolation::MissingFixture {
                            team,
                            matchday: matchday as Matchday,
                        })
                    }
                    _ => {
                        return Err(StructureViolation::DoubleBooked {
                            team,
                            matchday: matchday as Matchday,
                            count,
                        })
                    }
                }
            }
        }

        Ok(())
    }

    /// The two legs of every pairing are exactly `N - 1` matchdays apart.
    ///
    /// Holds for freshly generated schedules; label swaps made by mutation
    /// break it.
    pub fn check_leg_offset(&self) -> Result<(), StructureViolation> {
        let expected = (self.teams - 1) as Matchday;
        for first in 0..self.teams {
            for second in (first + 1)..self.teams {
                let a = self.home_label(first, second);
                let b = self.home_label(second, first);
                if a.abs_diff(b) != expected {
                    return Err(StructureViolation::LegOffset { first, second, a, b, expected });
                }
            }
        }
        Ok(())
    }

    /// Shorthand for a passing coverage check
    pub fn is_valid(&self) -> bool {
        self.check_coverage().is_ok()
    }

    /// Copy out as nested rows
    pub fn rows(&self) -> Vec<Vec<Matchday>> {
        self.cells.chunks(self.teams).map(|row| row.to_vec()).collect()
    }

    /// Load from JSON file (array of rows)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let schedule: Schedule = serde_json::from_str(&content)?;
        Ok(schedule)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Matchday>>> for Schedule {
    type Error = StructureViolation;

    fn try_from(rows: Vec<Vec<Matchday>>) -> Result<Self, Self::Error> {
        Schedule::from_rows(rows)
    }
}

impl From<Schedule> for Vec<Vec<Matchday>> {
    fn from(schedule: Schedule) -> Self {
        schedule.rows()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.matchdays().to_string().len();
        for row in self.cells.chunks(self.teams) {
            let line: Vec<String> = row.iter().map(|label| format!("{:>width$}", label)).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built 4-team double round-robin (circle method)
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
    fn test_accessors_follow_row_home_convention() {
        let s = four_team_schedule();
        assert_eq!(s.teams(), 4);
        assert_eq!(s.matchdays(), 6);
        assert_eq!(s.home_label(0, 1), 1);
        assert_eq!(s.away_label(1, 0), 1);
        assert_eq!(s.away_label(0, 1), 4);
        assert_eq!(s.home_labels(2).collect::<Vec<_>>(), vec![5, 6, 1]);
        assert_eq!(s.away_labels(2).collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_hand_built_schedule_is_valid() {
        let s = four_team_schedule();
        assert_eq!(s.check_coverage(), Ok(()));
        assert_eq!(s.check_leg_offset(), Ok(()));
    }

    #[test]
    fn test_calendar_has_one_fixture_per_matchday() {
        let s = four_team_schedule();
        let calendar = s.calendar(0);
        assert_eq!(calendar.len(), 8);
        assert!(calendar[0].is_none());
        assert!(calendar[7].is_none());
        assert_eq!(calendar[1], Some(Fixture { opponent: 1, venue: Venue::Home }));
        assert_eq!(calendar[4], Some(Fixture { opponent: 1, venue: Venue::Away }));
        assert!(calendar[1..=6].iter().all(Option::is_some));
    }

    #[test]
    fn test_fixtures_on_is_perfect_matching() {
        let s = four_team_schedule();
        for matchday in 1..=6 {
            let fixtures = s.fixtures_on(matchday);
            assert_eq!(fixtures.len(), 2);
            let mut seen: Vec<TeamId> = fixtures.iter().flat_map(|&(h, a)| [h, a]).collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_swap_labels_keeps_coverage_but_breaks_offset() {
        let mut s = four_team_schedule();
        s.swap_labels(1, 2);
        assert!(s.is_valid());
        assert!(matches!(s.check_leg_offset(), Err(StructureViolation::LegOffset { .. })));
    }

    #[test]
    fn test_double_booking_detected() {
        let mut s = four_team_schedule();
        s.set(0, 1, 2);
        assert!(matches!(
            s.check_coverage(),
            Err(StructureViolation::MissingFixture { team: 0, matchday: 1 })
        ));

        let mut s = four_team_schedule();
        s.set(0, 3, 1);
        assert!(matches!(
            s.check_coverage(),
            Err(StructureViolation::DoubleBooked { team: 0, matchday: 1, count: 2 })
        ));
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert!(matches!(
            Schedule::from_rows(vec![vec![0]]),
            Err(StructureViolation::TooFewTeams { teams: 1 })
        ));
        assert!(matches!(
            Schedule::from_rows(vec![vec![0, 1], vec![2]]),
            Err(StructureViolation::NotSquare { row: 1, .. })
        ));
        assert!(matches!(
            Schedule::from_rows(vec![vec![1, 1], vec![2, 0]]),
            Err(StructureViolation::DiagonalUsed { team: 0, .. })
        ));
        assert!(matches!(
            Schedule::from_rows(vec![vec![0, 3], vec![2, 0]]),
            Err(StructureViolation::LabelOutOfRange { label: 3, .. })
        ));
    }

    #[test]
    fn test_json_uses_nested_rows() {
        let s = four_team_schedule();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.starts_with("[[0,1,2,3]"));
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);

        let bad = serde_json::from_str::<Schedule>("[[0,1],[1]]");
        assert!(bad.is_err());
    }
}
