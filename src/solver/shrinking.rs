//! Active-set bookkeeping and the shrinking heuristic
//!
//! Between epochs the solver carries forward the extreme projected gradients
//! of the previous pass. With shrinking enabled, a coordinate sitting at a
//! bound whose gradient lies outside those extremes is unlikely to move again,
//! so it is swapped out of the active prefix of the visiting order. Once the
//! stopping criterion holds on the shrunk problem, the full set is restored
//! and the optimization continues until it holds for every coordinate.

use rand::seq::SliceRandom;
use rand::Rng;

/// Visiting order plus the previous epoch's projected-gradient extremes
#[derive(Debug, Clone)]
pub struct ActiveSet {
    /// Permutation of sample indices; the first `active` entries are live
    order: Vec<usize>,
    active: usize,
    shrinking: bool,
    pgrad_max_old: f64,
    pgrad_min_old: f64,
}

impl ActiveSet {
    /// Create an active set covering all `n_samples` coordinates
    pub fn new(n_samples: usize, shrinking: bool) -> Self {
        Self {
            order: (0..n_samples).collect(),
            active: n_samples,
            shrinking,
            pgrad_max_old: f64::INFINITY,
            pgrad_min_old: f64::NEG_INFINITY,
        }
    }

    /// Randomly permute the active coordinates for the next epoch
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order[..self.active].shuffle(rng);
    }

    /// Number of live coordinates
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Sample index at position `pos` of the visiting order
    pub fn at(&self, pos: usize) -> usize {
        self.order[pos]
    }

    /// Active positions in visiting order
    pub fn indices(&self) -> &[usize] {
        &self.order[..self.active]
    }

    /// Reference bounds for the shrinking test, `None` when disabled
    pub fn shrink_bounds(&self) -> Option<(f64, f64)> {
        if self.shrinking {
            Some((self.pgrad_max_old, self.pgrad_min_old))
        } else {
            None
        }
    }

    /// Drop the coordinate at `pos`; the last live entry takes its place
    pub fn shrink(&mut self, pos: usize) {
        self.active -= 1;
        self.order.swap(pos, self.active);
    }

    pub fn is_shrunk(&self) -> bool {
        self.active < self.order.len()
    }

    pub fn n_shrunk(&self) -> usize {
        self.order.len() - self.active
    }

    /// Bring every coordinate back and forget the reference bounds
    pub fn restore(&mut self) {
        self.active = self.order.len();
        self.pgrad_max_old = f64::INFINITY;
        self.pgrad_min_old = f64::NEG_INFINITY;
    }

    /// Carry an epoch's extremes forward as the next references
    ///
    /// A non-positive maximum (or non-negative minimum) gives no usable
    /// threshold and resets to the infinite sentinel.
    pub fn roll_bounds(&mut self, pgrad_max_new: f64, pgrad_min_new: f64) {
        self.pgrad_max_old = if pgrad_max_new <= 0.0 {
            f64::INFINITY
        } else {
            pgrad_max_new
        };
        self.pgrad_min_old = if pgrad_min_new >= 0.0 {
            f64::NEG_INFINITY
        } else {
            pgrad_min_new
        };
    }

    pub fn reference_bounds(&self) -> (f64, f64) {
        (self.pgrad_max_old, self.pgrad_min_old)
    }
}
