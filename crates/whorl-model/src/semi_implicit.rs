//! Generic semi-implicit spectral stepping driver.
//!
//! Concrete PDEs plug into [`SpectralModel`] through [`PdeSpec`]: they
//! supply the linear operator in spectral space, the nonlinear map in
//! real space, and the initial profile, and the driver owns the
//! transform choreography and the update
//! `U' = (U - dt * k2 * N) / (1 - dt * L)`. The linear term is treated
//! implicitly, the nonlinear term explicitly.

use std::time::Instant;

use num_complex::Complex64;

use crate::error::ModelError;
use crate::model::{Model, ModelCore};
use crate::spectral::{Scale, SpectralEngine};

/// The per-PDE plugin consumed by [`SpectralModel`].
pub trait PdeSpec {
    /// Name of the real-space field this PDE evolves.
    fn field_name(&self) -> &str;

    /// Linear operator `L` evaluated at squared wavenumber `k2`.
    fn linear(&self, k2: f64) -> f64;

    /// Nonlinear map applied pointwise to the field in real space.
    fn nonlinear(&self, u: f64) -> f64;

    /// Initial field value at physical position `[x, y, z]`.
    fn initial(&self, position: [f64; 3]) -> f64;
}

/// Wall-clock timings for the stages of the last `step`, in
/// microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Forward transform of the field.
    pub forward_us: u64,
    /// Pointwise nonlinear evaluation plus its forward transform.
    pub nonlinear_us: u64,
    /// Semi-implicit update over the outbox.
    pub integrate_us: u64,
    /// Backward transform to real space.
    pub backward_us: u64,
}

impl StageTimings {
    /// Total time across all stages.
    pub fn total_us(&self) -> u64 {
        self.forward_us + self.nonlinear_us + self.integrate_us + self.backward_us
    }
}

/// Semi-implicit driver for a single-field PDE.
///
/// `initialize` precomputes the squared-wavenumber table and the
/// linear operator over the outbox and fills the field over the inbox
/// from physical coordinates. `step` runs
/// forward / nonlinear / update / backward and leaves the field in
/// real-space representation.
pub struct SpectralModel<P> {
    core: ModelCore,
    spec: P,
    engine: Box<dyn SpectralEngine>,
    k2: Vec<f64>,
    lin: Vec<f64>,
    spectral: Vec<Complex64>,
    nonlinear: Vec<Complex64>,
    timings: StageTimings,
}

impl<P: PdeSpec> SpectralModel<P> {
    /// Creates an uninitialized model over the engine's box pair.
    pub fn new(
        grid: whorl_core::GridDescriptor,
        engine: Box<dyn SpectralEngine>,
        spec: P,
    ) -> Self {
        let core = ModelCore::new(grid, engine.inbox(), engine.outbox());
        Self {
            core,
            spec,
            engine,
            k2: Vec::new(),
            lin: Vec::new(),
            spectral: Vec::new(),
            nonlinear: Vec::new(),
            timings: StageTimings::default(),
        }
    }

    /// The PDE plugin.
    pub fn spec(&self) -> &P {
        &self.spec
    }
}

impl<P: PdeSpec> Model for SpectralModel<P> {
    fn core(&self) -> &ModelCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.core
    }

    fn timings(&self) -> StageTimings {
        self.timings
    }

    fn initialize(&mut self, _dt: f64) -> Result<(), ModelError> {
        self.core.begin_initialize()?;

        let outbox = self.core.outbox();
        let len_out = self.engine.len_outbox();
        self.k2 = Vec::with_capacity(len_out);
        self.lin = Vec::with_capacity(len_out);
        for coord in outbox.iter() {
            let k2 = self.core.grid().wavenumber_squared(coord);
            self.k2.push(k2);
            self.lin.push(self.spec.linear(k2));
        }
        self.spectral = vec![Complex64::default(); len_out];
        self.nonlinear = vec![Complex64::default(); len_out];

        let grid = self.core.grid().clone();
        let mut field = whorl_field::DistributedField::zeros(self.core.inbox());
        field.apply(|coord| self.spec.initial(grid.coord(coord)));
        self.core.insert_field(self.spec.field_name(), field);
        Ok(())
    }

    fn step(&mut self, dt: f64) -> Result<(), ModelError> {
        let Self {
            core,
            spec,
            engine,
            k2,
            lin,
            spectral,
            nonlinear,
            timings,
        } = self;
        core.begin_step()?;
        let field = core.field_mut(spec.field_name())?;

        let mark = Instant::now();
        engine.forward(field.data(), spectral)?;
        timings.forward_us = mark.elapsed().as_micros() as u64;

        let mark = Instant::now();
        for u in field.data_mut() {
            *u = spec.nonlinear(*u);
        }
        engine.forward(field.data(), nonlinear)?;
        timings.nonlinear_us = mark.elapsed().as_micros() as u64;

        let mark = Instant::now();
        for i in 0..spectral.len() {
            spectral[i] =
                (spectral[i] - nonlinear[i] * (dt * k2[i])) / (1.0 - dt * lin[i]);
        }
        timings.integrate_us = mark.elapsed().as_micros() as u64;

        let mark = Instant::now();
        engine.backward(spectral, field.data_mut(), Scale::Full)?;
        timings.backward_us = mark.elapsed().as_micros() as u64;
        Ok(())
    }
}
