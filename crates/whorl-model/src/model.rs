//! The model contract and its shared lifecycle state.

use indexmap::IndexMap;

use whorl_core::{Box3, GridDescriptor};
use whorl_field::{DistributedField, RealField};

use crate::error::ModelError;

/// Lifecycle phase of a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; fields and operators not yet allocated.
    Uninitialized,
    /// `initialize` has run; no step taken yet.
    Initialized,
    /// At least one step taken.
    Stepping,
}

/// Where the simulator applies boundary-condition modifiers relative
/// to the PDE update. The point in the step is a per-model policy, not
/// fixed by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryStage {
    /// Apply boundary conditions before `step`.
    BeforeStep,
    /// Apply boundary conditions after `step`, clamping the updated
    /// field.
    AfterStep,
}

/// Shared state every model carries: the grid, this worker's box pair,
/// the named-field registry, and the lifecycle phase.
///
/// Concrete models embed a `ModelCore` and delegate [`Model::core`]
/// to it; the core enforces the lifecycle contract so each model does
/// not re-implement the phase checks.
#[derive(Debug)]
pub struct ModelCore {
    grid: GridDescriptor,
    inbox: Box3,
    outbox: Box3,
    fields: IndexMap<String, RealField>,
    phase: Phase,
}

impl ModelCore {
    /// Creates an uninitialized core for one worker's box pair.
    pub fn new(grid: GridDescriptor, inbox: Box3, outbox: Box3) -> Self {
        Self {
            grid,
            inbox,
            outbox,
            fields: IndexMap::new(),
            phase: Phase::Uninitialized,
        }
    }

    /// The global grid.
    pub fn grid(&self) -> &GridDescriptor {
        &self.grid
    }

    /// This worker's real-space box.
    pub fn inbox(&self) -> Box3 {
        self.inbox
    }

    /// This worker's spectral-space box.
    pub fn outbox(&self) -> Box3 {
        self.outbox
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Marks the start of `initialize`. Fails if already initialized.
    pub fn begin_initialize(&mut self) -> Result<(), ModelError> {
        if self.phase != Phase::Uninitialized {
            return Err(ModelError::AlreadyInitialized);
        }
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// Marks the start of `step`. Fails before `initialize`.
    pub fn begin_step(&mut self) -> Result<(), ModelError> {
        if self.phase == Phase::Uninitialized {
            return Err(ModelError::NotInitialized);
        }
        self.phase = Phase::Stepping;
        Ok(())
    }

    /// Registers a named field, sized by the caller. Re-registering a
    /// name replaces the field.
    pub fn insert_field(&mut self, name: impl Into<String>, field: RealField) {
        self.fields.insert(name.into(), field);
    }

    /// Registers a zero-filled field over the inbox.
    pub fn insert_zero_field(&mut self, name: impl Into<String>) {
        self.fields
            .insert(name.into(), DistributedField::zeros(self.inbox));
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Result<&RealField, ModelError> {
        self.fields.get(name).ok_or_else(|| ModelError::UnknownField {
            name: name.to_owned(),
        })
    }

    /// Looks up a field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Result<&mut RealField, ModelError> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownField {
                name: name.to_owned(),
            })
    }

    /// Field names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// A pluggable PDE model driven by the simulator.
///
/// Implementations own their named fields through an embedded
/// [`ModelCore`]; the provided accessors delegate to it. `initialize`
/// is called exactly once, `step` any number of times afterwards, and
/// fields are left in real-space representation at the end of every
/// `step` so writers can read them directly.
pub trait Model {
    /// Shared lifecycle state.
    fn core(&self) -> &ModelCore;

    /// Shared lifecycle state, mutably.
    fn core_mut(&mut self) -> &mut ModelCore;

    /// Allocates fields and operators and sets initial values.
    fn initialize(&mut self, dt: f64) -> Result<(), ModelError>;

    /// Advances the model state by one increment of `dt`.
    fn step(&mut self, dt: f64) -> Result<(), ModelError>;

    /// When the simulator should apply boundary-condition modifiers.
    fn boundary_stage(&self) -> BoundaryStage {
        BoundaryStage::AfterStep
    }

    /// Stage timings of the most recent `step`, when the model tracks
    /// them.
    fn timings(&self) -> crate::StageTimings {
        crate::StageTimings::default()
    }

    /// Looks up a named real-space field.
    fn field(&self, name: &str) -> Result<&RealField, ModelError> {
        self.core().field(name)
    }

    /// Looks up a named real-space field, mutably.
    fn field_mut(&mut self, name: &str) -> Result<&mut RealField, ModelError> {
        self.core_mut().field_mut(name)
    }
}
