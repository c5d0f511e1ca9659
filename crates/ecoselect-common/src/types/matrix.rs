//! Square interaction matrix (row-major)

use serde::{Deserialize, Serialize};

/// N×N matrix of pairwise interaction coefficients
///
/// `A[i][j]` is the effect of candidate j's population on candidate i's
/// growth. Built once per run and never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    size: usize,
    values: Vec<f64>,
}

impl InteractionMatrix {
    /// All-zero matrix
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build from rows; returns `None` if the rows do not form a square matrix
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }

    /// Check `A[i][j] == A[j][i]` within tolerance
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.size).all(|i| {
            (i + 1..self.size).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Matrix-vector product `A · x`
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        (0..self.size)
            .map(|i| self.row(i).iter().zip(x).map(|(a, n)| a * n).sum())
            .collect()
    }
}
