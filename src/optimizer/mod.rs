//! Optimization entry points for SVM training
//!
//! This module ties the kernel and the DCD solver together and turns the raw
//! optimization result into a model that can make predictions.

use crate::core::{
    DataMatrix, Dataset, DcdConfig, OptimizationResult, Prediction, Result, SVMError, SVMModel,
    StopReason, TrainingReport,
};
use crate::kernel::{Kernel, LinearKernel};
use crate::loss::LearnerType;
use crate::solver::DCDSolver;
use std::sync::Arc;

/// Train a linear SVM on `dataset`
///
/// Fails with [`SVMError::InvalidConfiguration`] for non-positive class bounds
/// and [`SVMError::NotImplementedLearner`] for anything but binary
/// classification.
pub fn train<D: Dataset + ?Sized>(
    learner: LearnerType,
    dataset: &D,
    config: DcdConfig,
) -> Result<TrainedSVM> {
    SVMOptimizer::new(LinearKernel::new(), config).train(learner, dataset)
}

/// High-level SVM optimizer that integrates a kernel with the DCD solver
pub struct SVMOptimizer<K: Kernel> {
    kernel: Arc<K>,
    config: DcdConfig,
}

impl<K: Kernel> SVMOptimizer<K> {
    /// Create a new SVM optimizer with the given kernel and configuration
    pub fn new(kernel: K, config: DcdConfig) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config,
        }
    }

    /// Create a new SVM optimizer with default configuration
    pub fn with_kernel(kernel: K) -> Self {
        Self::new(kernel, DcdConfig::default())
    }

    /// Train an SVM model on the given dataset
    pub fn train<D: Dataset + ?Sized>(
        &self,
        learner: LearnerType,
        dataset: &D,
    ) -> Result<TrainedSVM<K>> {
        let matrix = dataset.matrix();
        let solver = DCDSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(learner, matrix)?;

        Ok(TrainedSVM::new(
            Arc::clone(&self.kernel),
            self.config.clone(),
            result,
        ))
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &DcdConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

/// A trained linear SVM: hyperplane `w'x + b` plus the dual solution
pub struct TrainedSVM<K: Kernel = LinearKernel> {
    kernel: Arc<K>,
    config: DcdConfig,
    weights: Vec<f64>,
    bias: f64,
    alpha: Vec<f64>,
    support_indices: Vec<usize>,
    epochs: usize,
    stop_reason: StopReason,
    report: Option<TrainingReport>,
}

impl<K: Kernel> TrainedSVM<K> {
    /// Create a new trained SVM model
    pub(crate) fn new(kernel: Arc<K>, config: DcdConfig, result: OptimizationResult) -> Self {
        Self {
            kernel,
            config,
            weights: result.weights,
            bias: result.bias,
            alpha: result.alpha,
            support_indices: result.support_vectors,
            epochs: result.epochs,
            stop_reason: result.stop_reason,
            report: result.report,
        }
    }

    /// Rebuild a model from a stored hyperplane
    pub fn from_hyperplane(kernel: K, weights: Vec<f64>, bias: f64) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config: DcdConfig::default(),
            weights,
            bias,
            alpha: Vec::new(),
            support_indices: Vec::new(),
            epochs: 0,
            stop_reason: StopReason::Converged,
            report: None,
        }
    }

    /// Attach the training configuration and outcome of a reloaded model
    pub fn with_provenance(
        mut self,
        config: DcdConfig,
        epochs: usize,
        stop_reason: StopReason,
    ) -> Self {
        self.config = config;
        self.epochs = epochs;
        self.stop_reason = stop_reason;
        self
    }

    /// Get the decision function value for a feature vector
    ///
    /// Features beyond the trained dimensionality are ignored; missing
    /// trailing features count as zero.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let n = self.weights.len().min(features.len());
        self.kernel.eval(&self.weights, features, n) + self.bias
    }

    /// Decision values for every sample of a matrix, checking dimensions
    pub fn decision_values(&self, matrix: &DataMatrix) -> Result<Vec<f64>> {
        if matrix.n_features() > self.weights.len() {
            return Err(SVMError::DimensionMismatch {
                expected: self.weights.len(),
                actual: matrix.n_features(),
            });
        }
        Ok((0..matrix.n_samples())
            .map(|i| self.decision_function(matrix.features(i)))
            .collect())
    }

    /// Hyperplane slope
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Final dual variables, one per training sample
    pub fn alpha_values(&self) -> &[f64] {
        &self.alpha
    }

    /// Get the indices of support vectors in the original training set
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.support_indices
    }

    pub fn n_support_vectors(&self) -> usize {
        self.support_indices.len()
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    pub fn report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    /// Configuration the model was trained with
    pub fn config(&self) -> &DcdConfig {
        &self.config
    }
}

impl<K: Kernel> SVMModel for TrainedSVM<K> {
    fn predict(&self, features: &[f64]) -> Prediction {
        let decision_value = self.decision_function(features);
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Prediction::new(label, decision_value)
    }

    fn bias(&self) -> f64 {
        self.bias
    }
}
