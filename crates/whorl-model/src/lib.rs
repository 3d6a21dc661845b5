//! Model lifecycle and the contracts between a model and its
//! collaborators.
//!
//! A [`Model`] owns one or more named real-space fields and the
//! operators defining a PDE, and is driven through an
//! initialize/step lifecycle by the simulator. The heavy lifting for
//! the common case lives in [`SpectralModel`], a generic semi-implicit
//! driver parameterized by a [`PdeSpec`]: concrete models supply the
//! linear operator, the nonlinear map, and the initial profile, and
//! inherit the transform/update plumbing.
//!
//! The spectral transform itself is an external collaborator behind
//! the [`SpectralEngine`] trait; initial and boundary conditions are
//! [`FieldModifier`]s applied by the simulator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod modifier;
pub mod semi_implicit;
pub mod spectral;

pub use error::{ModelError, TransformError};
pub use model::{BoundaryStage, Model, ModelCore, Phase};
pub use modifier::FieldModifier;
pub use semi_implicit::{PdeSpec, SpectralModel, StageTimings};
pub use spectral::{Scale, SpectralEngine};
