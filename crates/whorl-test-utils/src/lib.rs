//! Test utilities and mock types for Whorl development.
//!
//! Provides a no-op [`MockModel`] with registrable fields, a
//! [`FillModifier`] that overwrites a field with a constant, and a
//! [`RecordingWriter`] that captures every snapshot handed to it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::{Arc, Mutex};

use whorl_core::{Box3, GridDescriptor};
use whorl_io::{ResultsWriter, WriteError, WriterDomain};
use whorl_model::{FieldModifier, Model, ModelCore, ModelError};

/// Model whose `step` does nothing; fields are registered up front.
///
/// Useful for exercising simulator orchestration without transforms.
pub struct MockModel {
    core: ModelCore,
    pending_fields: Vec<String>,
}

impl MockModel {
    pub fn new(grid: GridDescriptor, inbox: Box3, outbox: Box3) -> Self {
        Self {
            core: ModelCore::new(grid, inbox, outbox),
            pending_fields: Vec::new(),
        }
    }

    /// Registers a zero-filled field to be created at `initialize`.
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.pending_fields.push(name.into());
        self
    }
}

impl Model for MockModel {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn initialize(&mut self, _dt: f64) -> Result<(), ModelError> {
        self.core.begin_initialize()?;
        for name in self.pending_fields.drain(..) {
            self.core.insert_zero_field(name);
        }
        Ok(())
    }

    fn step(&mut self, _dt: f64) -> Result<(), ModelError> {
        self.core.begin_step()
    }
}

/// Overwrites every value of one field with a constant, recording the
/// times it was applied at.
pub struct FillModifier {
    field: String,
    value: f64,
    pub applied_at: Arc<Mutex<Vec<f64>>>,
}

impl FillModifier {
    pub fn new(field: impl Into<String>, value: f64) -> Self {
        Self {
            field: field.into(),
            value,
            applied_at: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle for inspecting application times after the modifier is
    /// moved into the simulator.
    pub fn applications(&self) -> Arc<Mutex<Vec<f64>>> {
        Arc::clone(&self.applied_at)
    }
}

impl FieldModifier for FillModifier {
    fn apply(&mut self, model: &mut dyn Model, time: f64) -> Result<(), ModelError> {
        self.applied_at.lock().unwrap().push(time);
        let value = self.value;
        let field = model.field_mut(&self.field)?;
        for u in field.data_mut() {
            *u = value;
        }
        Ok(())
    }
}

/// One snapshot captured by a [`RecordingWriter`].
#[derive(Clone, Debug, PartialEq)]
pub struct Capture {
    pub save_index: usize,
    pub data: Vec<f64>,
}

/// Writer that stores every snapshot in memory, shared through an
/// `Arc<Mutex<_>>` so tests can inspect it after the simulator takes
/// ownership of the writer.
pub struct RecordingWriter {
    pub captures: Arc<Mutex<Vec<Capture>>>,
    pub domain: Arc<Mutex<Option<WriterDomain>>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self {
            captures: Arc::new(Mutex::new(Vec::new())),
            domain: Arc::new(Mutex::new(None)),
        }
    }

    /// Handles for inspecting the writer after it is moved into the
    /// simulator.
    pub fn handles(&self) -> (Arc<Mutex<Vec<Capture>>>, Arc<Mutex<Option<WriterDomain>>>) {
        (Arc::clone(&self.captures), Arc::clone(&self.domain))
    }
}

impl Default for RecordingWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsWriter for RecordingWriter {
    fn configure(&mut self, domain: &WriterDomain) -> Result<(), WriteError> {
        *self.domain.lock().unwrap() = Some(domain.clone());
        Ok(())
    }

    fn write(&mut self, save_index: usize, data: &[f64]) -> Result<(), WriteError> {
        self.captures.lock().unwrap().push(Capture {
            save_index,
            data: data.to_vec(),
        });
        Ok(())
    }
}
