//! Results writers.
//!
//! Every worker contributes its own sub-box to a shared results
//! artifact; the artifact carries global dimensions, origin, spacing,
//! and the per-field data type and name. Two reference writers are
//! provided: [`RawBinaryWriter`] (headerless little-endian payload)
//! and [`VtiWriter`] (VTK ImageData with a reserved header region
//! written by the group leader after all payload writes complete).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod raw;
pub mod vti;

pub use domain::{DataType, WriterDomain};
pub use error::WriteError;
pub use raw::RawBinaryWriter;
pub use vti::VtiWriter;

/// A sink for field snapshots, invoked on the save cadence.
///
/// A writer is configured once with the worker's slice of the global
/// domain, then `write` is called with a monotonically increasing save
/// index and the worker's local data in column-major (x-fastest)
/// order. Writers that share one artifact across workers must tolerate
/// concurrent invocation and order their header writes behind the
/// group barrier.
pub trait ResultsWriter {
    /// Binds the writer to one worker's slice of the global domain.
    fn configure(&mut self, domain: &WriterDomain) -> Result<(), WriteError>;

    /// Writes the local snapshot under the given save index.
    fn write(&mut self, save_index: usize, data: &[f64]) -> Result<(), WriteError>;
}
