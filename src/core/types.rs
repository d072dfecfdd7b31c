//! Core type definitions for SVM

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Dense column-major training matrix.
///
/// Every column is one sample: its feature values followed by the class label
/// in the last row. A matrix with `n_rows` rows therefore carries
/// `n_rows - 1` features per sample.
#[derive(Clone, Debug, PartialEq)]
pub struct DataMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl DataMatrix {
    /// Wrap column-major `data` of shape `n_rows x n_cols`
    pub fn new(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        if n_rows == 0 {
            return Err(SVMError::InvalidDataset(
                "matrix needs at least the label row".to_string(),
            ));
        }
        if data.len() != n_rows * n_cols {
            return Err(SVMError::DimensionMismatch {
                expected: n_rows * n_cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Build a matrix from per-sample feature vectors and labels
    pub fn from_samples(features: &[Vec<f64>], labels: &[f64]) -> Result<Self> {
        if features.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        if features.len() != labels.len() {
            return Err(SVMError::DimensionMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }

        let n_features = features[0].len();
        let mut data = Vec::with_capacity((n_features + 1) * features.len());
        for (x, &label) in features.iter().zip(labels) {
            if x.len() != n_features {
                return Err(SVMError::DimensionMismatch {
                    expected: n_features,
                    actual: x.len(),
                });
            }
            data.extend_from_slice(x);
            data.push(label);
        }

        Self::new(n_features + 1, features.len(), data)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of samples (columns)
    pub fn n_samples(&self) -> usize {
        self.n_cols
    }

    /// Number of features, excluding the label row
    pub fn n_features(&self) -> usize {
        self.n_rows - 1
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[col * self.n_rows + row]
    }

    /// Full column, label included
    pub fn column(&self, col: usize) -> &[f64] {
        let start = col * self.n_rows;
        &self.data[start..start + self.n_rows]
    }

    /// Feature part of a column
    pub fn features(&self, col: usize) -> &[f64] {
        &self.column(col)[..self.n_rows - 1]
    }

    /// Raw label-row value of a column
    pub fn label(&self, col: usize) -> f64 {
        self.get(self.n_rows - 1, col)
    }

    pub fn labels(&self) -> Vec<f64> {
        (0..self.n_cols).map(|col| self.label(col)).collect()
    }
}

/// Primal penalty formulation of the SVM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regularization {
    /// Hinge loss; box-constrained duals, no diagonal shift
    L1,
    /// Squared hinge loss; unbounded duals, diagonal shift 1/(2C)
    L2,
}

impl Default for Regularization {
    fn default() -> Self {
        Self::L1
    }
}

/// Why the coordinate descent loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Projected-gradient gap fell below the accuracy threshold
    Converged,
    /// Epoch budget exhausted first
    EpochLimit,
}

/// Objective values and support-vector count after training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    /// Dual objective 0.5 * (w'w + sum alpha_i^2 D_ii) - sum alpha_i
    pub dual_objective: f64,
    /// Primal objective 0.5 * w'w + sum C_i * loss(y_i f(x_i))
    pub primal_objective: f64,
    /// Samples whose alpha is above the zero threshold
    pub n_support_vectors: usize,
}

impl TrainingReport {
    /// Primal minus negated dual; zero at the optimum
    pub fn duality_gap(&self) -> f64 {
        self.primal_objective + self.dual_objective
    }
}

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Vec<f64>,
    /// Hyperplane slope, one entry per feature
    pub weights: Vec<f64>,
    /// Bias term (b), the last augmented weight entry
    pub bias: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of epochs performed
    pub epochs: usize,
    /// Terminal state of the loop
    pub stop_reason: StopReason,
    /// Present when objective reporting is enabled
    pub report: Option<TrainingReport>,
}

/// Configuration for the dual coordinate descent solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcdConfig {
    /// Upper bound (penalty) for positive-class duals
    pub cp: f64,
    /// Upper bound (penalty) for negative-class duals
    pub cn: f64,
    /// L1-SVM or L2-SVM
    pub regularization: Regularization,
    /// Epoch budget; 0 switches to a single pass of `iterations` steps
    pub epochs: usize,
    /// Inner steps when `epochs` is 0
    pub iterations: usize,
    /// Stop once the projected-gradient gap is at most this
    pub accuracy: f64,
    /// Seed for the per-epoch permutation
    pub seed: u64,
    /// Enable the shrinking heuristic
    pub shrinking: bool,
    /// Compute the objective report after training
    pub report_objective: bool,
}

impl Default for DcdConfig {
    fn default() -> Self {
        Self {
            cp: 1.0,
            cn: 1.0,
            regularization: Regularization::L1,
            epochs: 100,
            iterations: 0,
            accuracy: 1e-3,
            seed: 1,
            shrinking: false,
            report_objective: false,
        }
    }
}

impl DcdConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.cp > 0.0 && self.cp.is_finite()) {
            return Err(SVMError::InvalidConfiguration(format!(
                "Cp must be positive and finite, got {}",
                self.cp
            )));
        }
        if !(self.cn > 0.0 && self.cn.is_finite()) {
            return Err(SVMError::InvalidConfiguration(format!(
                "Cn must be positive and finite, got {}",
                self.cn
            )));
        }
        if !(self.accuracy >= 0.0 && self.accuracy.is_finite()) {
            return Err(SVMError::InvalidConfiguration(format!(
                "accuracy must be non-negative, got {}",
                self.accuracy
            )));
        }
        if self.epochs == 0 && self.iterations == 0 {
            return Err(SVMError::InvalidConfiguration(
                "either epochs or iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
