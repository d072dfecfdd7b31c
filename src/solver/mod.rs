//! SVM solver implementations
//!
//! This module implements dual coordinate descent for linear L1- and L2-SVMs
//! as described in "A Dual Coordinate Descent Method for Large-scale Linear
//! SVM" by Hsieh et al.

pub mod dcd;
pub mod shrinking;

pub use self::dcd::*;
pub use self::shrinking::*;
