use serde::{Deserialize, Serialize};

/// Standard deviation commonly used for RLWE error terms.
pub const DEFAULT_SIGMA: f64 = 3.2;

/// Parameters of a [NoiseGenerator](crate::generator::NoiseGenerator).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    /// Standard deviation of the discrete Gaussian.
    pub sigma: f64,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        NoiseParameters { sigma: DEFAULT_SIGMA }
    }
}

impl NoiseParameters {
    pub fn new(sigma: f64) -> Self {
        NoiseParameters { sigma }
    }

    /// # Panics
    /// Panics if sigma is negative or not finite.
    pub fn validate(&self) {
        assert!(
            self.sigma.is_finite() && self.sigma >= 0.0,
            "invalid sigma: {} is not a finite non-negative value",
            self.sigma
        );
    }
}
