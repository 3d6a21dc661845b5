//! Whorl: a distributed spectral solver framework for time-dependent
//! PDEs on regular 3-D grids.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Whorl sub-crates. For most users, adding `whorl` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use whorl::prelude::*;
//! use whorl::models::Diffusion;
//!
//! // A 16^3 grid owned by a single worker.
//! let grid = GridDescriptor::with_unit_spacing([16, 16, 16]).unwrap();
//! let decomposition = Decomposition::new(&grid, 0, 1).unwrap();
//!
//! // Pure diffusion under the generic semi-implicit driver.
//! let engine = SerialSpectralEngine::new(&grid).unwrap();
//! let model = SpectralModel::new(grid, Box::new(engine), Diffusion::new(1.0).unwrap());
//!
//! // Ten unit increments, saving every fifth.
//! let time = TimeController::new(0.0, 10.0, 1.0, SaveSchedule::Stride(5)).unwrap();
//! let mut sim = Simulator::new(decomposition, Box::new(model), time).unwrap();
//! sim.run().unwrap();
//! assert!(sim.done());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`grid`] | `whorl-core` | `GridDescriptor`, `Box3`, the shared linearization |
//! | [`field`] | `whorl-field` | `DistributedField` dense storage |
//! | [`domain`] | `whorl-domain` | `Decomposition` and the worker-group barrier |
//! | [`model`] | `whorl-model` | Model lifecycle, `SpectralEngine` contract, semi-implicit driver |
//! | [`fft`] | `whorl-fft` | Serial real-to-complex transform engine |
//! | [`io`] | `whorl-io` | Results writers (raw binary, VTK ImageData) |
//! | [`engine`] | `whorl-engine` | `TimeController` and `Simulator` orchestration |
//! | [`models`] | `whorl-models` | Reference models and field modifiers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid description, index boxes, and the shared column-major
/// linearization (`whorl-core`).
pub use whorl_core as grid;

/// Worker-local dense field storage (`whorl-field`).
pub use whorl_field as field;

/// Domain decomposition and worker-group collectives (`whorl-domain`).
///
/// [`domain::Decomposition`] partitions the grid; [`domain::WorkerGroup`]
/// provides the rendezvous barrier shared-artifact writers rely on.
pub use whorl_domain as domain;

/// Model lifecycle and collaborator contracts (`whorl-model`).
///
/// The [`model::Model`] and [`model::PdeSpec`] traits are the main
/// extension points for user-defined physics.
pub use whorl_model as model;

/// Serial spectral transform engine (`whorl-fft`).
pub use whorl_fft as fft;

/// Results writers (`whorl-io`).
///
/// [`io::RawBinaryWriter`] for headerless payloads, [`io::VtiWriter`]
/// for VTK ImageData artifacts with a leader-written header.
pub use whorl_io as io;

/// Time control and simulation orchestration (`whorl-engine`).
pub use whorl_engine as engine;

/// Reference models and field modifiers (`whorl-models`).
///
/// Includes [`models::Diffusion`], [`models::Pfc`], and the constant /
/// Gaussian / noise / clamped-slab modifiers.
pub use whorl_models as models;

/// Common imports for typical Whorl usage.
///
/// ```rust
/// use whorl::prelude::*;
/// ```
pub mod prelude {
    // Grid and boxes
    pub use whorl_core::{Box3, Coord, GridDescriptor};

    // Fields
    pub use whorl_field::{DistributedField, RealField};

    // Decomposition and collectives
    pub use whorl_domain::{Decomposition, GroupHandle, WorkerGroup};

    // Model contract and the semi-implicit driver
    pub use whorl_model::{
        BoundaryStage, FieldModifier, Model, PdeSpec, Scale, SpectralEngine, SpectralModel,
    };

    // Transforms
    pub use whorl_fft::SerialSpectralEngine;

    // Writers
    pub use whorl_io::{RawBinaryWriter, ResultsWriter, VtiWriter, WriterDomain};

    // Orchestration
    pub use whorl_engine::{SaveSchedule, Simulator, StepMetrics, TimeController};

    // Errors
    pub use whorl_core::{BoxError, GridError};
    pub use whorl_domain::{CollectiveError, DecompositionError};
    pub use whorl_engine::{SimulatorError, TimeError};
    pub use whorl_field::FieldError;
    pub use whorl_io::WriteError;
    pub use whorl_model::{ModelError, TransformError};
}
