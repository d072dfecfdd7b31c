//! Learner types and their margin losses
//!
//! Only binary classification is trainable. The other learner types keep the
//! dispatch open and fail with [`SVMError::NotImplementedLearner`].

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};

/// Kind of SVM learning problem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LearnerType {
    /// Two-class classification with labels in {+1, -1}
    BinaryClassification,
    /// epsilon-insensitive regression
    Regression { epsilon: f64 },
    /// One-class density estimation
    DensityEstimation { nu: f64 },
}

impl Default for LearnerType {
    fn default() -> Self {
        Self::BinaryClassification
    }
}

impl LearnerType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BinaryClassification => "binary classification",
            Self::Regression { .. } => "regression",
            Self::DensityEstimation { .. } => "density estimation",
        }
    }

    /// Error out unless this learner can be trained
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Self::BinaryClassification => Ok(()),
            other => Err(SVMError::NotImplementedLearner(other.name().to_string())),
        }
    }

    /// Loss at margin `yy_hat = y * f(x)`
    pub fn loss(&self, yy_hat: f64) -> Result<f64> {
        self.ensure_supported()?;
        Ok(hinge_loss(yy_hat))
    }

    /// Sub-gradient magnitude of the loss at `yy_hat`
    pub fn loss_gradient(&self, yy_hat: f64) -> Result<f64> {
        self.ensure_supported()?;
        Ok(hinge_loss_gradient(yy_hat))
    }
}

/// max(0, 1 - y*y_hat)
pub fn hinge_loss(yy_hat: f64) -> f64 {
    if yy_hat < 1.0 {
        1.0 - yy_hat
    } else {
        0.0
    }
}

pub fn hinge_loss_gradient(yy_hat: f64) -> f64 {
    if yy_hat < 1.0 {
        1.0
    } else {
        0.0
    }
}
