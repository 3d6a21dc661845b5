//! Common initial and boundary conditions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use whorl_model::{FieldModifier, Model, ModelError};

use crate::error::{require_finite, require_positive, ConfigError};

/// Fills a field with a constant value.
pub struct ConstantIc {
    field: String,
    value: f64,
}

impl ConstantIc {
    /// Constant fill of `value`.
    pub fn new(field: impl Into<String>, value: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            field: field.into(),
            value: require_finite("fill value", value)?,
        })
    }
}

impl FieldModifier for ConstantIc {
    fn apply(&mut self, model: &mut dyn Model, _time: f64) -> Result<(), ModelError> {
        let value = self.value;
        let field = model.field_mut(&self.field)?;
        for u in field.data_mut() {
            *u = value;
        }
        Ok(())
    }
}

/// Sets a field to the Gaussian `exp(-(x² + y² + z²) / 4D)` around the
/// physical origin.
pub struct GaussianIc {
    field: String,
    width: f64,
}

impl GaussianIc {
    /// Gaussian with width parameter `D`.
    pub fn new(field: impl Into<String>, width: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            field: field.into(),
            width: require_positive("width", width)?,
        })
    }
}

impl FieldModifier for GaussianIc {
    fn apply(&mut self, model: &mut dyn Model, _time: f64) -> Result<(), ModelError> {
        let width = self.width;
        let grid = model.core().grid().clone();
        let field = model.field_mut(&self.field)?;
        field.apply(|coord| {
            let [x, y, z] = grid.coord(coord);
            (-(x * x + y * y + z * z) / (4.0 * width)).exp()
        });
        Ok(())
    }
}

/// Adds seeded uniform noise to a field.
///
/// The generator is seeded deterministically, so a given seed and
/// decomposition always produce the same perturbation.
pub struct NoiseIc {
    field: String,
    seed: u64,
    amplitude: f64,
}

impl NoiseIc {
    /// Noise in `[-amplitude, amplitude)` from the given seed.
    pub fn new(field: impl Into<String>, seed: u64, amplitude: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            field: field.into(),
            seed,
            amplitude: require_positive("noise amplitude", amplitude)?,
        })
    }
}

impl FieldModifier for NoiseIc {
    fn apply(&mut self, model: &mut dyn Model, _time: f64) -> Result<(), ModelError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let amplitude = self.amplitude;
        let field = model.field_mut(&self.field)?;
        for u in field.data_mut() {
            *u += rng.gen_range(-amplitude..amplitude);
        }
        Ok(())
    }
}

/// Clamps a slab of cells at the low-x boundary to a fixed value.
///
/// Applied as a boundary condition it re-imposes the value after every
/// step, pinning the field at the domain edge.
pub struct FixedBc {
    field: String,
    value: f64,
    /// Slab thickness in cells along x, measured from the global low
    /// edge.
    thickness: i32,
}

impl FixedBc {
    /// Clamp the `thickness` lowest x-planes to `value`.
    pub fn new(field: impl Into<String>, value: f64, thickness: i32) -> Result<Self, ConfigError> {
        require_finite("clamp value", value)?;
        require_positive("slab thickness", f64::from(thickness))?;
        Ok(Self {
            field: field.into(),
            value,
            thickness,
        })
    }
}

impl FieldModifier for FixedBc {
    fn apply(&mut self, model: &mut dyn Model, _time: f64) -> Result<(), ModelError> {
        let field = model.field_mut(&self.field)?;
        let bounds = field.bounds();
        let data = field.data_mut();
        for (offset, coord) in bounds.iter().enumerate() {
            if coord[0] < self.thickness {
                data[offset] = self.value;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use whorl_core::{Box3, GridDescriptor};
    use whorl_model::Model;
    use whorl_test_utils::MockModel;

    fn model(dims: [i32; 3]) -> MockModel {
        let grid = GridDescriptor::with_unit_spacing(dims).unwrap();
        let inbox = Box3::from_dims(dims).unwrap();
        let outbox = inbox.r2c(0).unwrap();
        let mut m = MockModel::new(grid, inbox, outbox).with_field("u");
        m.initialize(1.0).unwrap();
        m
    }

    #[test]
    fn constant_fill_overwrites_everything() {
        let mut m = model([4, 3, 2]);
        ConstantIc::new("u", 7.5).unwrap().apply(&mut m, 0.0).unwrap();
        assert!(m.field("u").unwrap().data().iter().all(|&v| v == 7.5));
    }

    #[test]
    fn gaussian_peaks_at_the_origin_and_decays() {
        let mut m = model([8, 8, 8]);
        GaussianIc::new("u", 1.0).unwrap().apply(&mut m, 0.0).unwrap();
        let field = m.field("u").unwrap();
        assert_eq!(*field.at([0, 0, 0]).unwrap(), 1.0);
        assert!(*field.at([4, 4, 4]).unwrap() < 1e-5);
        let center = *field.at([0, 0, 0]).unwrap();
        let next = *field.at([1, 0, 0]).unwrap();
        assert!(next < center);
    }

    #[test]
    fn noise_is_deterministic_per_seed_and_bounded() {
        let mut a = model([4, 4, 4]);
        let mut b = model([4, 4, 4]);
        NoiseIc::new("u", 42, 0.1).unwrap().apply(&mut a, 0.0).unwrap();
        NoiseIc::new("u", 42, 0.1).unwrap().apply(&mut b, 0.0).unwrap();
        assert_eq!(a.field("u").unwrap().data(), b.field("u").unwrap().data());
        assert!(a.field("u").unwrap().data().iter().all(|v| v.abs() <= 0.1));

        let mut c = model([4, 4, 4]);
        NoiseIc::new("u", 43, 0.1).unwrap().apply(&mut c, 0.0).unwrap();
        assert_ne!(a.field("u").unwrap().data(), c.field("u").unwrap().data());
    }

    #[test]
    fn fixed_bc_clamps_only_the_low_x_slab() {
        let mut m = model([6, 3, 2]);
        ConstantIc::new("u", 1.0).unwrap().apply(&mut m, 0.0).unwrap();
        FixedBc::new("u", -2.0, 2).unwrap().apply(&mut m, 0.0).unwrap();

        let field = m.field("u").unwrap();
        for (coord, &value) in field.indexed_iter() {
            if coord[0] < 2 {
                assert_eq!(value, -2.0, "coord {coord:?} should be clamped");
            } else {
                assert_eq!(value, 1.0, "coord {coord:?} should be untouched");
            }
        }
    }

    #[test]
    fn unknown_field_propagates() {
        let mut m = model([4, 3, 2]);
        let err = ConstantIc::new("missing", 0.0)
            .unwrap()
            .apply(&mut m, 0.0)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownField { .. }));
    }
}
