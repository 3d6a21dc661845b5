//! Domain decomposition and worker-group collectives.
//!
//! [`Decomposition`] partitions the global grid across worker ranks
//! with a communication-minimizing processor grid, deriving each
//! worker's real-space inbox and spectral-space outbox. The
//! construction is deterministic and communication-free: every worker
//! computes the identical layout from the same global inputs.
//!
//! [`WorkerGroup`] provides the explicit rendezvous primitive that
//! models the collective-operation contract: shared-artifact writers
//! must complete their sub-box writes before the leader writes the
//! shared header.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decomposition;
pub mod error;
pub mod group;

pub use decomposition::Decomposition;
pub use error::{CollectiveError, DecompositionError};
pub use group::{GroupHandle, WorkerGroup};
