//! Data loading and dataset implementations
//!
//! This module provides implementations of the Dataset trait for the LibSVM
//! and CSV formats. Both produce a dense [`DataMatrix`](crate::core::DataMatrix)
//! with the label in the last row.

pub mod csv;
pub mod info;
pub mod libsvm;

pub use self::csv::*;
pub use self::info::*;
pub use self::libsvm::*;
