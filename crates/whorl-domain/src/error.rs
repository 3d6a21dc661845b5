//! Error types for decomposition and collectives.

use std::fmt;

/// Errors from [`Decomposition`](crate::Decomposition) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecompositionError {
    /// `worker_count` was zero.
    NoWorkers,
    /// `rank` is not in `0..worker_count`.
    InvalidRank {
        /// The offending rank.
        rank: usize,
        /// The worker count it must be below.
        worker_count: usize,
    },
    /// An axis cannot be split into the requested number of parts
    /// without producing an empty sub-range.
    UnsplittableAxis {
        /// The axis (0, 1 or 2).
        axis: usize,
        /// Number of indices along the axis.
        extent: i32,
        /// Requested number of parts.
        parts: i32,
    },
    /// The partition algorithm produced an inconsistent inbox/outbox
    /// pair. This signals a defect in the decomposition itself, not bad
    /// user input; the whole worker group must abort.
    InvariantViolated {
        /// The rank whose pair is inconsistent.
        rank: usize,
        /// What went wrong.
        detail: String,
    },
}

impl fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker count must be at least 1"),
            Self::InvalidRank { rank, worker_count } => {
                write!(f, "rank {rank} outside worker group of size {worker_count}")
            }
            Self::UnsplittableAxis {
                axis,
                extent,
                parts,
            } => write!(
                f,
                "axis {axis} with {extent} indexes cannot be split into {parts} non-empty parts"
            ),
            Self::InvariantViolated { rank, detail } => {
                write!(f, "decomposition invariant violated for rank {rank}: {detail}")
            }
        }
    }
}

impl std::error::Error for DecompositionError {}

/// Errors from worker-group collective operations.
///
/// Any collective failure is fatal to the entire group: partial
/// completion would desynchronize per-worker state irrecoverably, so
/// there is no retry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectiveError {
    /// A peer's side of the rendezvous channel was dropped.
    Disconnected {
        /// The rank that observed the disconnect.
        rank: usize,
    },
}

impl fmt::Display for CollectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { rank } => {
                write!(f, "worker group disconnected (observed by rank {rank})")
            }
        }
    }
}

impl std::error::Error for CollectiveError {}
