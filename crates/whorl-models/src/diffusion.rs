//! Pure diffusion.

use whorl_model::PdeSpec;

use crate::error::{require_positive, ConfigError};

/// `∂u/∂t = a ∇²u`, solved fully implicitly: `L = -a k²`, no
/// nonlinear term. The default initial profile is the Gaussian
/// `exp(-(x² + y² + z²) / 4a)`, the exact solution at `t = 1` for a
/// point source at the origin.
#[derive(Clone, Debug)]
pub struct Diffusion {
    diffusivity: f64,
}

impl Diffusion {
    /// Diffusion with the given (positive) diffusivity.
    pub fn new(diffusivity: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            diffusivity: require_positive("diffusivity", diffusivity)?,
        })
    }

    /// The diffusion coefficient.
    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }
}

impl PdeSpec for Diffusion {
    fn field_name(&self) -> &str {
        "psi"
    }

    fn linear(&self, k2: f64) -> f64 {
        -self.diffusivity * k2
    }

    fn nonlinear(&self, _u: f64) -> f64 {
        0.0
    }

    fn initial(&self, position: [f64; 3]) -> f64 {
        let [x, y, z] = position;
        (-(x * x + y * y + z * z) / (4.0 * self.diffusivity)).exp()
    }
}
