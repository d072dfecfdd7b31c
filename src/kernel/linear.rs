//! Linear kernel implementation

use crate::kernel::Kernel;

/// Linear kernel: K(x, y) = x^T * y
///
/// The dual coordinate descent solver keeps an explicit weight vector, which is
/// only meaningful for this kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn eval(&self, a: &[f64], b: &[f64], n_features: usize) -> f64 {
        let n = n_features.min(a.len()).min(b.len());
        dot(&a[..n], &b[..n])
    }
}

/// Dense dot product over the shorter of the two slices
pub(crate) fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}
