//! High-level API for linear SVM operations
//!
//! This module provides a user-friendly interface for common SVM tasks,
//! including training, prediction, and model evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dcdsvm::api::LinearSVM;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Train a model on data
//! let svm = LinearSVM::new()
//!     .with_c(1.0)
//!     .with_accuracy(0.001)
//!     .train_from_file("data.libsvm")?;
//!
//! // Make predictions
//! let predictions = svm.predict_from_file("test.libsvm")?;
//! println!("Accuracy: {:.2}%", svm.evaluate_from_file("test.libsvm")? * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{
    DataMatrix, Dataset, DcdConfig, Prediction, Regularization, Result, SVMError, SVMModel,
    StopReason, TrainingReport,
};
use crate::data::{CSVDataset, LibSVMDataset};
use crate::kernel::{Kernel, LinearKernel};
use crate::loss::LearnerType;
use crate::optimizer::{SVMOptimizer, TrainedSVM};
use std::path::Path;

/// High-level SVM interface with builder pattern
pub struct LinearSVM<K: Kernel = LinearKernel> {
    kernel: K,
    learner: LearnerType,
    config: DcdConfig,
}

impl LinearSVM<LinearKernel> {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self::with_kernel(LinearKernel::new())
    }
}

impl Default for LinearSVM<LinearKernel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kernel> LinearSVM<K> {
    /// Create SVM with custom kernel
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            learner: LearnerType::BinaryClassification,
            config: DcdConfig::default(),
        }
    }

    /// Set the same box bound C for both classes
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.cp = c;
        self.config.cn = c;
        self
    }

    /// Set separate box bounds for positive and negative samples
    pub fn with_class_weights(mut self, cp: f64, cn: f64) -> Self {
        self.config.cp = cp;
        self.config.cn = cn;
        self
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.config.regularization = regularization;
        self
    }

    /// Set the epoch budget; 0 switches to a fixed iteration budget
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    /// Set the iteration budget used when epochs is 0
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Set the projected gradient gap tolerance
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.config.accuracy = accuracy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_shrinking(mut self, shrinking: bool) -> Self {
        self.config.shrinking = shrinking;
        self
    }

    /// Compute dual/primal objectives once training stops
    pub fn with_report(mut self, report: bool) -> Self {
        self.config.report_objective = report;
        self
    }

    pub fn with_learner(mut self, learner: LearnerType) -> Self {
        self.learner = learner;
        self
    }

    /// Replace the whole solver configuration
    pub fn with_config(mut self, config: DcdConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DcdConfig {
        &self.config
    }

    /// Train on a dataset
    pub fn train<D: Dataset + ?Sized>(self, dataset: &D) -> Result<TrainedModel<K>> {
        let optimizer = SVMOptimizer::new(self.kernel, self.config);
        let model = optimizer.train(self.learner, dataset)?;
        Ok(TrainedModel { model })
    }

    /// Train from LibSVM format file
    pub fn train_from_file<P: AsRef<Path>>(self, path: P) -> Result<TrainedModel<K>> {
        let dataset = LibSVMDataset::from_file(path)?;
        self.train(&dataset)
    }

    /// Train from CSV file (automatically detects headers)
    pub fn train_from_csv<P: AsRef<Path>>(self, path: P) -> Result<TrainedModel<K>> {
        let dataset = CSVDataset::from_file(path)?;
        self.train(&dataset)
    }
}

/// Trained SVM model with high-level prediction interface
pub struct TrainedModel<K: Kernel = LinearKernel> {
    model: TrainedSVM<K>,
}

impl<K: Kernel> TrainedModel<K> {
    /// Wrap an already trained or reloaded model
    pub fn from_inner(model: TrainedSVM<K>) -> Self {
        Self { model }
    }

    /// Decision value `w'x + b` of a feature vector
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.model.decision_function(features)
    }

    /// Predict a single feature vector
    pub fn predict(&self, features: &[f64]) -> Prediction {
        self.model.predict(features)
    }

    /// Predict from dataset
    pub fn predict_dataset<D: Dataset + ?Sized>(&self, dataset: &D) -> Vec<Prediction> {
        self.model.predict_matrix(dataset.matrix())
    }

    /// Predict from LibSVM file
    pub fn predict_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let dataset = LibSVMDataset::from_file(path)?;
        Ok(self.predict_dataset(&dataset))
    }

    /// Predict from CSV file
    pub fn predict_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Prediction>> {
        let dataset = CSVDataset::from_file(path)?;
        Ok(self.predict_dataset(&dataset))
    }

    /// Evaluate accuracy on a dataset
    pub fn evaluate<D: Dataset + ?Sized>(&self, dataset: &D) -> f64 {
        self.evaluate_detailed(dataset).accuracy()
    }

    /// Evaluate accuracy from LibSVM file
    pub fn evaluate_from_file<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = LibSVMDataset::from_file(path)?;
        Ok(self.evaluate(&dataset))
    }

    /// Evaluate accuracy from CSV file
    pub fn evaluate_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let dataset = CSVDataset::from_file(path)?;
        Ok(self.evaluate(&dataset))
    }

    /// Get detailed evaluation metrics
    pub fn evaluate_detailed<D: Dataset + ?Sized>(&self, dataset: &D) -> EvaluationMetrics {
        let predictions = self.predict_dataset(dataset);
        let labels = dataset.get_labels();

        let mut tp = 0; // True positives
        let mut tn = 0; // True negatives
        let mut fp = 0; // False positives
        let mut fn_ = 0; // False negatives

        for (pred, &actual) in predictions.iter().zip(labels.iter()) {
            match (pred.label > 0.0, actual > 0.0) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        EvaluationMetrics::new(tp, tn, fp, fn_)
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            n_features: self.model.weights().len(),
            n_support_vectors: self.model.n_support_vectors(),
            bias: self.model.bias(),
            epochs: self.model.epochs(),
            stop_reason: self.model.stop_reason(),
            report: self.model.report().copied(),
            support_vector_indices: self.model.support_vector_indices().to_vec(),
        }
    }

    /// Get the underlying trained model
    pub fn inner(&self) -> &TrainedSVM<K> {
        &self.model
    }
}

/// Detailed evaluation metrics
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(
            self.true_negatives,
            self.true_negatives + self.false_positives,
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub n_features: usize,
    pub n_support_vectors: usize,
    pub bias: f64,
    pub epochs: usize,
    pub stop_reason: StopReason,
    pub report: Option<TrainingReport>,
    pub support_vector_indices: Vec<usize>,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Train a linear SVM on LibSVM data with default parameters
    pub fn train_libsvm<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        LinearSVM::new().train_from_file(path)
    }

    /// Train a linear SVM on CSV data with default parameters
    pub fn train_csv<P: AsRef<Path>>(path: P) -> Result<TrainedModel> {
        LinearSVM::new().train_from_csv(path)
    }

    /// Train with custom C parameter
    pub fn train_libsvm_with_c<P: AsRef<Path>>(path: P, c: f64) -> Result<TrainedModel> {
        LinearSVM::new().with_c(c).train_from_file(path)
    }

    /// Quick evaluation: train on training file, test on test file
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
    ) -> Result<f64> {
        let model = train_libsvm(train_path)?;
        model.evaluate_from_file(test_path)
    }

    /// Hold-out validation on a sequential split
    pub fn simple_validation<D: Dataset + ?Sized>(
        dataset: &D,
        train_ratio: f64,
        c: f64,
    ) -> Result<f64> {
        if train_ratio <= 0.0 || train_ratio >= 1.0 {
            return Err(SVMError::InvalidParameter(format!(
                "Train ratio must be between 0 and 1, got: {train_ratio}"
            )));
        }

        let matrix = dataset.matrix();
        let n = matrix.n_samples();
        let train_size = (n as f64 * train_ratio) as usize;
        if train_size == 0 || train_size == n {
            return Err(SVMError::InvalidParameter(format!(
                "Train ratio {train_ratio} leaves an empty split of {n} samples"
            )));
        }

        // Simple sequential split (not randomized for reproducibility)
        let train = split(matrix, 0..train_size)?;
        let test = split(matrix, train_size..n)?;

        let model = LinearSVM::new().with_c(c).train(&train)?;
        Ok(model.evaluate(&test))
    }

    fn split(matrix: &DataMatrix, columns: std::ops::Range<usize>) -> Result<DataMatrix> {
        let n_cols = columns.len();
        let data = columns
            .flat_map(|col| matrix.column(col).iter().copied())
            .collect();
        DataMatrix::new(matrix.n_rows(), n_cols, data)
    }
}
