//! Worker-local dense field storage for Whorl simulations.
//!
//! A [`DistributedField`] is one worker's portion of a globally
//! decomposed field: a contiguous buffer over an inclusive [`Box3`],
//! addressed either by global grid indices (offset-aware) or through
//! the raw linear buffer handed to transform engines and writers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;

pub use error::FieldError;
pub use field::{DistributedField, RealField};
