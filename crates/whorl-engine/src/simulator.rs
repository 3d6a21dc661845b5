//! Orchestration of model, time, modifiers, and writers.

use std::fmt;
use std::time::Instant;

use whorl_domain::Decomposition;
use whorl_io::{ResultsWriter, WriteError, WriterDomain};
use whorl_model::{BoundaryStage, FieldModifier, Model, ModelError};

use crate::metrics::StepMetrics;
use crate::time::{TimeController, TimeError};

/// Errors from the stepping loop.
#[derive(Debug)]
pub enum SimulatorError {
    /// `step` was called after `done()` turned true.
    AlreadyDone,
    /// The model rejected an operation.
    Model(ModelError),
    /// Time control rejected an operation.
    Time(TimeError),
    /// A results writer failed.
    Write(WriteError),
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyDone => write!(f, "stepped past the end of the simulation"),
            Self::Model(e) => write!(f, "model failure: {e}"),
            Self::Time(e) => write!(f, "time control failure: {e}"),
            Self::Write(e) => write!(f, "results write failure: {e}"),
        }
    }
}

impl std::error::Error for SimulatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            Self::Time(e) => Some(e),
            Self::Write(e) => Some(e),
            Self::AlreadyDone => None,
        }
    }
}

impl From<ModelError> for SimulatorError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

impl From<TimeError> for SimulatorError {
    fn from(e: TimeError) -> Self {
        Self::Time(e)
    }
}

impl From<WriteError> for SimulatorError {
    fn from(e: WriteError) -> Self {
        Self::Write(e)
    }
}

/// Drives one worker's model through the stepping loop.
///
/// Construction initializes the model. The first `step` applies the
/// registered initial conditions at `t0` (and writes results if the
/// schedule fires at increment zero) before advancing time. Every
/// step advances time, applies boundary conditions at the model's
/// [`BoundaryStage`], steps the model, and fans the field snapshot out
/// to the writers when the save schedule fires. The save index handed
/// to writers is a writer-local monotonic counter, independent of the
/// increment counter.
pub struct Simulator {
    decomposition: Decomposition,
    model: Box<dyn Model>,
    time: TimeController,
    initial_conditions: Vec<Box<dyn FieldModifier>>,
    boundary_conditions: Vec<Box<dyn FieldModifier>>,
    writers: Vec<(String, Box<dyn ResultsWriter>)>,
    save_counter: usize,
    metrics: StepMetrics,
}

impl Simulator {
    /// Creates the simulator and initializes the model with the
    /// controller's time increment.
    pub fn new(
        decomposition: Decomposition,
        mut model: Box<dyn Model>,
        time: TimeController,
    ) -> Result<Self, SimulatorError> {
        model.initialize(time.dt())?;
        Ok(Self {
            decomposition,
            model,
            time,
            initial_conditions: Vec::new(),
            boundary_conditions: Vec::new(),
            writers: Vec::new(),
            save_counter: 0,
            metrics: StepMetrics::default(),
        })
    }

    /// The decomposition this worker runs under.
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    /// The model being driven.
    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// The model being driven, mutably.
    pub fn model_mut(&mut self) -> &mut dyn Model {
        self.model.as_mut()
    }

    /// The time controller.
    pub fn time(&self) -> &TimeController {
        &self.time
    }

    /// Metrics of the most recent step.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// Registers an initial condition, applied in registration order
    /// before the first step.
    pub fn add_initial_condition(&mut self, modifier: Box<dyn FieldModifier>) {
        self.initial_conditions.push(modifier);
    }

    /// Registers a boundary condition, applied in registration order
    /// around every step.
    pub fn add_boundary_condition(&mut self, modifier: Box<dyn FieldModifier>) {
        self.boundary_conditions.push(modifier);
    }

    /// Registers a results writer for the named field, configuring it
    /// with this worker's slice of the global domain.
    pub fn add_results_writer(
        &mut self,
        field: impl Into<String>,
        mut writer: Box<dyn ResultsWriter>,
    ) -> Result<(), SimulatorError> {
        let field = field.into();
        let domain = WriterDomain::from_decomposition(&self.decomposition, field.clone());
        writer.configure(&domain)?;
        self.writers.push((field, writer));
        Ok(())
    }

    /// Whether the simulation has reached its end.
    pub fn done(&self) -> bool {
        self.time.done()
    }

    /// Number of results writes performed so far.
    pub fn saves(&self) -> usize {
        self.save_counter
    }

    fn apply_initial_conditions(&mut self) -> Result<(), SimulatorError> {
        let t = self.time.t();
        for ic in &mut self.initial_conditions {
            ic.apply(self.model.as_mut(), t)?;
        }
        Ok(())
    }

    fn apply_boundary_conditions(&mut self) -> Result<(), SimulatorError> {
        let t = self.time.t();
        for bc in &mut self.boundary_conditions {
            bc.apply(self.model.as_mut(), t)?;
        }
        Ok(())
    }

    fn write_results(&mut self) -> Result<(), SimulatorError> {
        for (field, writer) in &mut self.writers {
            let snapshot = self.model.field(field)?;
            writer.write(self.save_counter, snapshot.data())?;
        }
        self.save_counter += 1;
        Ok(())
    }

    /// Advances the simulation by one increment.
    pub fn step(&mut self) -> Result<(), SimulatorError> {
        if self.done() {
            return Err(SimulatorError::AlreadyDone);
        }
        let step_mark = Instant::now();
        let mut metrics = StepMetrics::default();

        if self.time.increment() == 0 {
            self.apply_initial_conditions()?;
            if self.time.do_save() {
                self.write_results()?;
            }
        }

        self.time.next()?;

        let mark = Instant::now();
        if self.model.boundary_stage() == BoundaryStage::BeforeStep {
            self.apply_boundary_conditions()?;
        }
        metrics.boundary_us = mark.elapsed().as_micros() as u64;

        self.model.step(self.time.dt())?;
        metrics.stages = self.model.timings();

        let mark = Instant::now();
        if self.model.boundary_stage() == BoundaryStage::AfterStep {
            self.apply_boundary_conditions()?;
        }
        metrics.boundary_us += mark.elapsed().as_micros() as u64;

        if self.time.do_save() {
            let mark = Instant::now();
            self.write_results()?;
            metrics.write_us = mark.elapsed().as_micros() as u64;
        }

        metrics.saves = self.save_counter as u64;
        metrics.total_us = step_mark.elapsed().as_micros() as u64;
        self.metrics = metrics;
        Ok(())
    }

    /// Runs the stepping loop to completion.
    pub fn run(&mut self) -> Result<(), SimulatorError> {
        while !self.done() {
            self.step()?;
        }
        Ok(())
    }
}
