//! Dual coordinate descent solver for linear L1- and L2-SVMs
//!
//! Implements the method of Hsieh, Chang, Lin, Keerthi and Sundararajan,
//! "A Dual Coordinate Descent Method for Large-scale Linear SVM" (ICML 2008).
//!
//! The dual is solved one multiplier at a time. Each sample is augmented with
//! a constant 1 so the bias is folded into the weight vector, and the weight
//! vector `w = sum_i alpha_i y_i x_i` is updated together with every alpha so a
//! single gradient costs one dot product.

use crate::core::{
    DataMatrix, DcdConfig, OptimizationResult, Regularization, Result, SVMError, StopReason,
    TrainingReport,
};
use crate::kernel::{dot, Kernel, LinearKernel};
use crate::loss::LearnerType;
use crate::solver::shrinking::ActiveSet;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// An alpha within this distance of a bound counts as sitting on it
pub const ALPHA_ZERO: f64 = 1.0e-7;

/// Projected gradients at or below this magnitude skip the update
const PGRAD_EPS: f64 = 1.0e-12;

/// Per-class constants fixed by the regularization mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassConstants {
    pub diag_p: f64,
    pub diag_n: f64,
    pub upper_bound_p: f64,
    pub upper_bound_n: f64,
}

impl ClassConstants {
    pub fn new(config: &DcdConfig) -> Self {
        match config.regularization {
            Regularization::L1 => Self {
                diag_p: 0.0,
                diag_n: 0.0,
                upper_bound_p: config.cp,
                upper_bound_n: config.cn,
            },
            Regularization::L2 => Self {
                diag_p: 0.5 / config.cp,
                diag_n: 0.5 / config.cn,
                upper_bound_p: f64::INFINITY,
                upper_bound_n: f64::INFINITY,
            },
        }
    }

    /// (diagonal shift, upper bound) for a sample with label `y`
    pub fn for_label(&self, y: f64) -> (f64, f64) {
        if y > 0.0 {
            (self.diag_p, self.upper_bound_p)
        } else {
            (self.diag_n, self.upper_bound_n)
        }
    }
}

/// Outcome of visiting one coordinate
enum Visit {
    Shrunk,
    Checked(f64),
}

/// Solver state for one training call
struct DcdState<'a> {
    matrix: &'a DataMatrix,
    n_features: usize,
    y: Vec<f64>,
    alpha: Vec<f64>,
    /// Augmented weights; the last entry is the bias
    w: Vec<f64>,
    qd: Vec<f64>,
    constants: ClassConstants,
}

impl<'a> DcdState<'a> {
    fn new<K: Kernel>(kernel: &K, config: &DcdConfig, matrix: &'a DataMatrix) -> Self {
        let n = matrix.n_samples();
        let n_features = matrix.n_features();
        let constants = ClassConstants::new(config);

        let y: Vec<f64> = (0..n)
            .map(|i| if matrix.label(i) > 0.0 { 1.0 } else { -1.0 })
            .collect();

        // Diagonal of Q + D for the augmented samples; the trailing 1 is the bias term
        let qd = (0..n)
            .map(|i| {
                let x = matrix.features(i);
                let (diag, _) = constants.for_label(y[i]);
                diag + kernel.eval(x, x, n_features) + 1.0
            })
            .collect();

        Self {
            matrix,
            n_features,
            y,
            alpha: vec![0.0; n],
            w: vec![0.0; n_features + 1],
            qd,
            constants,
        }
    }

    /// Margin w'x_i + b of sample `i`
    fn decision(&self, i: usize) -> f64 {
        dot(&self.w[..self.n_features], self.matrix.features(i)) + self.w[self.n_features]
    }

    /// Check, and possibly update, coordinate `i`
    fn visit(&mut self, i: usize, shrink_bounds: Option<(f64, f64)>) -> Visit {
        let yi = self.y[i];
        let (diag, c) = self.constants.for_label(yi);
        let alpha_old = self.alpha[i];

        let g = yi * self.decision(i) - 1.0 + alpha_old * diag;

        let pgrad = if alpha_old <= ALPHA_ZERO {
            match shrink_bounds {
                Some((pgrad_max_old, _)) if g > pgrad_max_old => return Visit::Shrunk,
                _ => g.min(0.0),
            }
        } else if c - alpha_old <= ALPHA_ZERO {
            match shrink_bounds {
                Some((_, pgrad_min_old)) if g < pgrad_min_old => return Visit::Shrunk,
                _ => g.max(0.0),
            }
        } else {
            g
        };

        if pgrad.abs() > PGRAD_EPS {
            let alpha_new = (alpha_old - g / self.qd[i]).max(0.0).min(c);
            let delta = (alpha_new - alpha_old) * yi;
            let matrix = self.matrix;
            let x = matrix.features(i);
            for (wj, xj) in self.w[..self.n_features].iter_mut().zip(x) {
                *wj += delta * xj;
            }
            self.w[self.n_features] += delta;
            self.alpha[i] = alpha_new;
        }

        Visit::Checked(pgrad)
    }

    /// Post-training objectives; reads state only
    fn report(&self, learner: &LearnerType, config: &DcdConfig) -> Result<TrainingReport> {
        let ww = dot(&self.w, &self.w);
        let squared = config.regularization == Regularization::L2;

        let mut dual = 0.5 * ww;
        let mut primal = 0.5 * ww;
        let mut n_support_vectors = 0;

        for (i, (&alpha, &yi)) in self.alpha.iter().zip(&self.y).enumerate() {
            let (diag, _) = self.constants.for_label(yi);
            dual += 0.5 * alpha * alpha * diag - alpha;

            let penalty = if yi > 0.0 { config.cp } else { config.cn };
            let loss = learner.loss(yi * self.decision(i))?;
            primal += penalty * if squared { loss * loss } else { loss };

            if alpha > ALPHA_ZERO {
                n_support_vectors += 1;
            }
        }

        Ok(TrainingReport {
            dual_objective: dual,
            primal_objective: primal,
            n_support_vectors,
        })
    }
}

/// Dual coordinate descent solver
///
/// The kernel only supplies the diagonal terms; the update rule itself relies
/// on an explicit weight vector, so `LinearKernel` is the meaningful choice.
pub struct DCDSolver<K: Kernel = LinearKernel> {
    kernel: K,
    config: DcdConfig,
}

impl DCDSolver<LinearKernel> {
    /// Create a linear solver with the given configuration
    pub fn linear(config: DcdConfig) -> Self {
        Self::new(LinearKernel::new(), config)
    }
}

impl<K: Kernel> DCDSolver<K> {
    /// Create a new DCD solver with the given kernel and configuration
    pub fn new(kernel: K, config: DcdConfig) -> Self {
        Self { kernel, config }
    }

    pub fn config(&self) -> &DcdConfig {
        &self.config
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Solve the dual problem for `matrix`
    ///
    /// The matrix holds one sample per column with the label in the last row;
    /// labels are mapped to +1 when positive and -1 otherwise.
    pub fn solve(&self, learner: LearnerType, matrix: &DataMatrix) -> Result<OptimizationResult> {
        self.config.validate()?;
        learner.ensure_supported()?;

        let n = matrix.n_samples();
        if n == 0 {
            return Err(SVMError::EmptyDataset);
        }

        let mut state = DcdState::new(&self.kernel, &self.config, matrix);

        // With an epoch budget every epoch is one exact pass; otherwise a
        // single pass of `iterations` steps wraps around the permutation.
        let (max_epochs, steps) = if self.config.epochs > 0 {
            (self.config.epochs, None)
        } else {
            (1, Some(self.config.iterations))
        };

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut active = ActiveSet::new(n, self.config.shrinking && steps.is_none());
        let mut epoch = 0;

        let stop_reason = loop {
            active.shuffle(&mut rng);

            let mut pgrad_max_new = f64::NEG_INFINITY;
            let mut pgrad_min_new = f64::INFINITY;
            let mut record = |pgrad: f64| {
                pgrad_max_new = pgrad_max_new.max(pgrad);
                pgrad_min_new = pgrad_min_new.min(pgrad);
            };

            match steps {
                None => {
                    let mut pos = 0;
                    while pos < active.len() {
                        match state.visit(active.at(pos), active.shrink_bounds()) {
                            Visit::Shrunk => active.shrink(pos),
                            Visit::Checked(pgrad) => {
                                record(pgrad);
                                pos += 1;
                            }
                        }
                    }
                }
                Some(n_iter) => {
                    for t in 0..n_iter {
                        if let Visit::Checked(pgrad) = state.visit(active.at(t % n), None) {
                            record(pgrad);
                        }
                    }
                }
            }

            epoch += 1;
            let gap = pgrad_max_new - pgrad_min_new;
            debug!(
                "epoch {epoch}: pgrad_max={pgrad_max_new:.6e} pgrad_min={pgrad_min_new:.6e} gap={gap:.6e} active={}",
                active.len()
            );

            if gap <= self.config.accuracy {
                if !active.is_shrunk() {
                    break StopReason::Converged;
                }
                debug!("unshrinking {} coordinates", active.n_shrunk());
                active.restore();
            } else {
                active.roll_bounds(pgrad_max_new, pgrad_min_new);
            }

            if epoch >= max_epochs {
                break StopReason::EpochLimit;
            }
        };

        match stop_reason {
            StopReason::Converged => info!(
                "DCD terminated: accuracy {} reached after {epoch} epochs",
                self.config.accuracy
            ),
            StopReason::EpochLimit => {
                info!("DCD terminated: epoch limit {max_epochs} reached")
            }
        }

        let report = if self.config.report_objective {
            let report = state.report(&learner, &self.config)?;
            info!("Objective value: {:.6}", report.dual_objective);
            info!("Primal objective: {:.6}", report.primal_objective);
            info!("Number of SVs: {}", report.n_support_vectors);
            Some(report)
        } else {
            None
        };

        let support_vectors = state
            .alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > ALPHA_ZERO { Some(i) } else { None })
            .collect();

        let bias = state.w[state.n_features];
        state.w.truncate(state.n_features);

        Ok(OptimizationResult {
            alpha: state.alpha,
            weights: state.w,
            bias,
            support_vectors,
            epochs: epoch,
            stop_reason,
            report,
        })
    }
}
