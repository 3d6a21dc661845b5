//! Basic phase-field crystal model.

use whorl_model::PdeSpec;

use crate::error::{require_finite, require_positive, ConfigError};

/// The one-mode phase-field crystal model.
///
/// Linear part `L(k²) = -k² (Bl - C(k²))` with the two-point
/// correlation `C(k²) = -Bx (-2k² + k⁴)`, nonlinear part
/// `f(u) = p2 u² + p3 u³`. The initial state is a crystalline seed of
/// radius `seed_radius` embedded in a liquid of density `n_liquid`:
/// inside the seed the density is `n_solid` plus a one-mode
/// approximant of the bcc lattice.
#[derive(Clone, Debug)]
pub struct Pfc {
    bx: f64,
    bl: f64,
    p2: f64,
    p3: f64,
    amplitude: f64,
    seed_radius: f64,
    n_solid: f64,
    n_liquid: f64,
}

impl Default for Pfc {
    fn default() -> Self {
        Self {
            bx: 1.3,
            bl: 1.0,
            p2: -1.0 / 2.0,
            p3: 1.0 / 3.0,
            amplitude: 1.0,
            seed_radius: 20.0,
            n_solid: -0.04,
            n_liquid: -0.05,
        }
    }
}

impl Pfc {
    /// Model with custom bulk moduli, keeping the default seed.
    pub fn new(bx: f64, bl: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            bx: require_finite("Bx", bx)?,
            bl: require_finite("Bl", bl)?,
            ..Self::default()
        })
    }

    /// Replaces the seed geometry.
    pub fn with_seed(mut self, radius: f64, amplitude: f64) -> Result<Self, ConfigError> {
        self.seed_radius = require_positive("seed radius", radius)?;
        self.amplitude = require_finite("seed amplitude", amplitude)?;
        Ok(self)
    }

    /// Replaces the solid and liquid densities.
    pub fn with_densities(mut self, n_solid: f64, n_liquid: f64) -> Result<Self, ConfigError> {
        self.n_solid = require_finite("solid density", n_solid)?;
        self.n_liquid = require_finite("liquid density", n_liquid)?;
        Ok(self)
    }
}

impl PdeSpec for Pfc {
    fn field_name(&self) -> &str {
        "density"
    }

    fn linear(&self, k2: f64) -> f64 {
        let c = -self.bx * (-2.0 * k2 + k2 * k2);
        -k2 * (self.bl - c)
    }

    fn nonlinear(&self, u: f64) -> f64 {
        self.p2 * u * u + self.p3 * u * u * u
    }

    fn initial(&self, position: [f64; 3]) -> f64 {
        let [x, y, z] = position;
        if x * x + y * y + z * z > self.seed_radius * self.seed_radius {
            return self.n_liquid;
        }
        let (cx, cy, cz) = (x.cos(), y.cos(), z.cos());
        self.n_solid + self.amplitude * (cx * cy + cy * cz + cz * cx)
    }
}
