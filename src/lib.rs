//! Linear Support Vector Machine trained by Dual Coordinate Descent
//!
//! Based on "A Dual Coordinate Descent Method for Large-scale Linear SVM" by
//! Hsieh, Chang, Lin, Keerthi and Sundararajan (ICML 2008).

pub mod api;
pub mod core;
pub mod data;
pub mod kernel;
pub mod loss;
pub mod optimizer;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, LinearSVM, ModelInfo, TrainedModel};
pub use crate::core::error::{Result, SVMError};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{CSVDataset, DatasetInfo, Datatype, LibSVMDataset};
pub use crate::kernel::{Kernel, LinearKernel};
pub use crate::loss::LearnerType;
pub use crate::optimizer::{train, SVMOptimizer, TrainedSVM};
pub use crate::solver::DCDSolver;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
