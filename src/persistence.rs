//! Model serialization and persistence
//!
//! A linear model is fully described by its hyperplane, so only the weight
//! vector and bias are stored, together with metadata about how it was
//! trained. Models are written as pretty-printed JSON.

use crate::api::TrainedModel;
use crate::core::{DcdConfig, Result, SVMError, StopReason};
use crate::kernel::LinearKernel;
use crate::optimizer::TrainedSVM;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

const LINEAR_KERNEL: &str = "linear";

/// Serializable representation of a trained SVM model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableModel {
    /// Hyperplane slope, one entry per feature
    pub weights: Vec<f64>,
    /// Bias term
    pub bias: f64,
    /// Kernel type identifier
    pub kernel_type: String,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of support vectors
    pub n_support_vectors: usize,
    /// Training parameters used
    pub training_params: DcdConfig,
    pub epochs: usize,
    pub stop_reason: StopReason,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl SerializableModel {
    /// Create a serializable model from a trained model
    pub fn from_trained_model(model: &TrainedModel<LinearKernel>) -> Self {
        let inner = model.inner();

        Self {
            weights: inner.weights().to_vec(),
            bias: model.info().bias,
            kernel_type: LINEAR_KERNEL.to_string(),
            metadata: ModelMetadata {
                library_version: crate::VERSION.to_string(),
                n_support_vectors: inner.n_support_vectors(),
                training_params: inner.config().clone(),
                epochs: inner.epochs(),
                stop_reason: inner.stop_reason(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| SVMError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Convert back to a trained model
    ///
    /// Dual variables are not stored, so the reloaded model predicts exactly
    /// like the original but reports no support vector indices.
    pub fn to_trained_model(&self) -> Result<TrainedModel<LinearKernel>> {
        if self.kernel_type != LINEAR_KERNEL {
            return Err(SVMError::SerializationError(format!(
                "unsupported kernel type '{}'",
                self.kernel_type
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(SVMError::SerializationError(
                "model contains non-finite coefficients".to_string(),
            ));
        }

        let svm = TrainedSVM::from_hyperplane(LinearKernel::new(), self.weights.clone(), self.bias)
            .with_provenance(
                self.metadata.training_params.clone(),
                self.metadata.epochs,
                self.metadata.stop_reason,
            );
        Ok(TrainedModel::from_inner(svm))
    }

    /// Print model summary
    pub fn print_summary(&self) {
        let params = &self.metadata.training_params;
        println!("=== SVM Model Summary ===");
        println!("Kernel Type: {}", self.kernel_type);
        println!("Features: {}", self.weights.len());
        println!("Support Vectors: {}", self.metadata.n_support_vectors);
        println!("Bias: {:.6}", self.bias);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!(
            "Training: {} epoch(s), {:?}",
            self.metadata.epochs, self.metadata.stop_reason
        );
        println!("Training Parameters:");
        println!("  Cp: {}", params.cp);
        println!("  Cn: {}", params.cn);
        println!("  Regularization: {:?}", params.regularization);
        println!("  Epochs: {}", params.epochs);
        println!("  Iterations: {}", params.iterations);
        println!("  Accuracy: {}", params.accuracy);
        println!("  Seed: {}", params.seed);
        println!("  Shrinking: {}", params.shrinking);
    }
}
