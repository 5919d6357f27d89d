//! Travel distances between team venues
//!
//! A zero off-diagonal entry means the two teams share a stadium.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schedule::TeamId;

/// Square matrix of non-negative travel costs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Validate and build from rows
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyDistances);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ConfigError::NonSquareDistances {
                    row: from,
                    len: row.len(),
                    expected: size,
                });
            }
            for (to, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidDistance { from, to, value });
                }
            }
            cells.extend(row);
        }

        Ok(Self { size, cells })
    }

    /// Every pair of distinct venues `distance` apart
    pub fn uniform(size: usize, distance: f64) -> Result<Self, ConfigError> {
        let rows = (0..size)
            .map(|i| (0..size).map(|j| if i == j { 0.0 } else { distance }).collect())
            .collect();
        Self::new(rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: TeamId, to: TeamId) -> f64 {
        self.cells[from * self.size + to]
    }

    /// Largest entry in the matrix
    pub fn max_distance(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }

    /// Ordered pairs `(i, j)`, `i != j`, that share a stadium.
    ///
    /// A symmetric matrix lists each sharing couple twice.
    pub fn shared_stadium_pairs(&self) -> Vec<(TeamId, TeamId)> {
        let mut pairs = Vec::new();
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j && self.get(i, j) == 0.0 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Resize for a schedule of `teams` teams.
    ///
    /// Odd leagues are padded with a bye team; its venue is placed at the
    /// league's mean off-diagonal distance from everyone (1.0 when that mean
    /// is zero) so byes never count as a shared stadium.
    pub fn padded_to(&self, teams: usize) -> Result<Self, ConfigError> {
        if teams == self.size {
            return Ok(self.clone());
        }
        if teams != self.size + 1 || self.size % 2 == 0 {
            return Err(ConfigError::DistanceSizeMismatch { teams, size: self.size });
        }

        let bye = self.mean_off_diagonal();
        let bye = if bye > 0.0 { bye } else { 1.0 };

        let mut rows = self.rows();
        for row in rows.iter_mut() {
            row.push(bye);
        }
        let mut bye_row = vec![bye; teams];
        bye_row[self.size] = 0.0;
        rows.push(bye_row);

        Self::new(rows)
    }

    fn mean_off_diagonal(&self) -> f64 {
        if self.size < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..self.size {
            for j in (0..self.size).filter(|&j| j != i) {
                total += self.get(i, j);
            }
        }
        total / (self.size * (self.size - 1)) as f64
    }

    /// Copy out as nested rows
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = ConfigError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        DistanceMatrix::new(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.rows()
    }
}
