//! In-place field mutation hooks for initial and boundary conditions.

use crate::error::ModelError;
use crate::model::Model;

/// Mutates one or more of a model's named fields in place.
///
/// The same trait serves initial conditions (applied once before the
/// first step) and boundary conditions (applied around every step at
/// the model's [`BoundaryStage`](crate::BoundaryStage)). `time` is the
/// current simulation time for time-dependent conditions.
pub trait FieldModifier {
    /// Applies the modification at simulation time `time`.
    fn apply(&mut self, model: &mut dyn Model, time: f64) -> Result<(), ModelError>;
}
