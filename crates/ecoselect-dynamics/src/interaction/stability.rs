//! Stability diagnostic for an interaction matrix
//!
//! The population update carries an implicit unit self-limitation, so the
//! community matrix of the ecosystem is `A - I`. The ecosystem is reported
//! stable when every eigenvalue of `A - I` is negative. The diagnostic is
//! informational: it reads the matrix and never modifies it.

use ecoselect_common::{InteractionMatrix, StabilityReport};

/// Read-only check over an already-built matrix
pub trait StabilityValidator: Send + Sync {
    fn assess(&self, matrix: &InteractionMatrix) -> StabilityReport;
}

/// Cyclic Jacobi eigenvalue solver for the symmetric part of the matrix
#[derive(Debug, Clone)]
pub struct EigenStability {
    max_sweeps: usize,
    tolerance: f64,
}

impl Default for EigenStability {
    fn default() -> Self {
        Self {
            max_sweeps: 64,
            tolerance: 1e-12,
        }
    }
}

impl EigenStability {
    pub fn new(max_sweeps: usize, tolerance: f64) -> Self {
        Self {
            max_sweeps,
            tolerance,
        }
    }

    /// Eigenvalues of the symmetric n×n row-major matrix `m`, ascending.
    ///
    /// Returns an empty vector when `m` does not hold n×n entries.
    pub fn symmetric_eigenvalues(&self, m: &[f64], n: usize) -> Vec<f64> {
        if n.checked_mul(n) != Some(m.len()) {
            return Vec::new();
        }
        let mut a = m.to_vec();

        for _ in 0..self.max_sweeps {
            let off: f64 = (0..n)
                .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
                .map(|(i, j)| a[i * n + j] * a[i * n + j])
                .sum();
            if off.sqrt() < self.tolerance {
                break;
            }

            for p in 0..n {
                for q in (p + 1)..n {
                    let apq = a[p * n + q];
                    if apq.abs() < f64::MIN_POSITIVE {
                        continue;
                    }
                    let theta = (a[q * n + q] - a[p * n + p]) / (2.0 * apq);
                    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                    let c = 1.0 / (t * t + 1.0).sqrt();
                    let s = t * c;

                    for k in 0..n {
                        let akp = a[k * n + p];
                        let akq = a[k * n + q];
                        a[k * n + p] = c * akp - s * akq;
                        a[k * n + q] = s * akp + c * akq;
                    }
                    for k in 0..n {
                        let apk = a[p * n + k];
                        let aqk = a[q * n + k];
                        a[p * n + k] = c * apk - s * aqk;
                        a[q * n + k] = s * apk + c * aqk;
                    }
                }
            }
        }

        let mut eigenvalues: Vec<f64> = (0..n).map(|i| a[i * n + i]).collect();
        eigenvalues.sort_by(f64::total_cmp);
        eigenvalues
    }
}

impl StabilityValidator for EigenStability {
    fn assess(&self, matrix: &InteractionMatrix) -> StabilityReport {
        let n = matrix.size();
        let mut community = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                community[i * n + j] = 0.5 * (matrix.get(i, j) + matrix.get(j, i));
            }
            community[i * n + i] -= 1.0;
        }

        let eigenvalues = self.symmetric_eigenvalues(&community, n);
        let max_eigenvalue = eigenvalues.last().copied().unwrap_or(f64::NEG_INFINITY);

        StabilityReport {
            ecosystem_stable: eigenvalues.iter().all(|&l| l < 0.0),
            max_eigenvalue,
            eigenvalues,
        }
    }
}
