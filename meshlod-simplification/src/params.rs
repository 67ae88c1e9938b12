//! Decimation parameters

use crate::quadric::DEFAULT_SINGULAR_EPSILON;

/// Tuning knobs of the quadric decimation schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimationParams {
    /// Upper bound on collapse rounds. Default: 100
    pub max_iterations: usize,
    /// Exponent of the threshold schedule; higher values relax the threshold faster. Default: 7
    pub aggressiveness: i32,
    /// Scale of the threshold schedule. Default: 1e-9
    pub base_threshold: f64,
    /// Floor for the target triangle count. Default: 4
    pub min_triangles: usize,
    /// Determinant magnitude below which the optimal point is not solved. Default: 1e-10
    pub singular_epsilon: f64,
}

impl Default for DecimationParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            aggressiveness: 7,
            base_threshold: 1e-9,
            min_triangles: 4,
            singular_epsilon: DEFAULT_SINGULAR_EPSILON,
        }
    }
}

impl DecimationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_aggressiveness(mut self, aggressiveness: i32) -> Self {
        self.aggressiveness = aggressiveness;
        self
    }

    pub fn with_min_triangles(mut self, min_triangles: usize) -> Self {
        self.min_triangles = min_triangles;
        self
    }

    pub fn with_singular_epsilon(mut self, epsilon: f64) -> Self {
        self.singular_epsilon = epsilon;
        self
    }

    /// Collapse threshold for a given (zero-based) iteration: `base * (iteration + 3)^aggressiveness`.
    pub fn threshold(&self, iteration: usize) -> f64 {
        self.base_threshold * ((iteration + 3) as f64).powi(self.aggressiveness)
    }

    /// Triangle count to stop at for a reduction ratio (0.0 = keep all, 1.0 = maximum reduction).
    ///
    /// The ratio is clamped to `[0, 1]`; halves round to even.
    pub fn target_triangles(&self, original: usize, reduction_ratio: f32) -> usize {
        let keep = 1.0 - f64::from(reduction_ratio.clamp(0.0, 1.0));
        let target = (original as f64 * keep).round_ties_even() as usize;
        target.max(self.min_triangles)
    }
}
