//! Error types for field storage.

use std::fmt;
use whorl_core::{Box3, Coord};

/// Errors from [`DistributedField`](crate::DistributedField) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A grid index lies outside the field's box.
    IndexOutOfRange {
        /// The offending index.
        coord: Coord,
        /// The field's box.
        bounds: Box3,
    },
    /// A supplied buffer does not match the box volume.
    ///
    /// Invariant violation: `data.len() == bounds.volume()` must hold
    /// at all times; resizing a field means reconstructing it.
    SizeMismatch {
        /// Length of the supplied buffer.
        len: usize,
        /// Required length (`bounds.volume()`).
        expected: usize,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { coord, bounds } => {
                write!(
                    f,
                    "index [{}, {}, {}] outside field box {bounds}",
                    coord[0], coord[1], coord[2]
                )
            }
            Self::SizeMismatch { len, expected } => {
                write!(f, "buffer length {len} does not match box volume {expected}")
            }
        }
    }
}

impl std::error::Error for FieldError {}
