//! Reference models and field modifiers.
//!
//! [`Diffusion`] and [`Pfc`] are [`PdeSpec`](whorl_model::PdeSpec)
//! implementations for the generic semi-implicit driver; the modifier
//! types cover the common initial and boundary conditions (constant
//! fill, Gaussian profile, seeded noise, clamped slab).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diffusion;
pub mod error;
pub mod modifiers;
pub mod pfc;

pub use diffusion::Diffusion;
pub use error::ConfigError;
pub use modifiers::{ConstantIc, FixedBc, GaussianIc, NoiseIc};
pub use pfc::Pfc;
