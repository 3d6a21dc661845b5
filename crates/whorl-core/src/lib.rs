//! Core types for the Whorl spectral solver framework.
//!
//! This is the leaf crate with zero dependencies. It defines the global
//! grid description ([`GridDescriptor`]), the inclusive 3-D index range
//! ([`Box3`]) with its real-to-complex symmetry mapping, and the single
//! column-major linearization convention shared by field storage,
//! transform adapters, and results writers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod box3;
pub mod error;
pub mod grid;

pub use box3::{Box3, Box3Iter, Coord};
pub use error::{BoxError, GridError};
pub use grid::GridDescriptor;
