//! Kernel trait definition

use std::sync::Arc;

/// Kernel function trait
///
/// A kernel is a pure similarity function between two dense feature vectors.
/// Only the first `n_features` entries of each slice take part, so a raw
/// matrix column (label row included) can be passed directly.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(a, b)
    fn eval(&self, a: &[f64], b: &[f64], n_features: usize) -> f64;
}

impl<K: Kernel + ?Sized> Kernel for Arc<K> {
    fn eval(&self, a: &[f64], b: &[f64], n_features: usize) -> f64 {
        (**self).eval(a, b, n_features)
    }
}
