//! Core traits for SVM implementation

use crate::core::{DataMatrix, Prediction};

/// Dataset abstraction: anything that can hand the solver a training matrix
pub trait Dataset {
    /// Column-major matrix with the label in the last row
    fn matrix(&self) -> &DataMatrix;

    /// Number of samples in the dataset
    fn len(&self) -> usize {
        self.matrix().n_samples()
    }

    /// Number of features (dimensionality)
    fn dim(&self) -> usize {
        self.matrix().n_features()
    }

    /// Get all labels as a vector
    fn get_labels(&self) -> Vec<f64> {
        self.matrix().labels()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dataset for DataMatrix {
    fn matrix(&self) -> &DataMatrix {
        self
    }
}

/// Trained SVM model
pub trait SVMModel {
    /// Predict a single feature vector
    fn predict(&self, features: &[f64]) -> Prediction;

    /// Predict every sample of a matrix
    fn predict_matrix(&self, matrix: &DataMatrix) -> Vec<Prediction> {
        (0..matrix.n_samples())
            .map(|i| self.predict(matrix.features(i)))
            .collect()
    }

    /// Get the bias term
    fn bias(&self) -> f64;
}
