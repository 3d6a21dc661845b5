//! Error types for grid and box construction.

use std::fmt;

/// Errors from [`GridDescriptor`](crate::GridDescriptor) construction.
///
/// Configuration errors: detected at construction time, fatal to the
/// run, never retried.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A grid dimension is less than 1.
    EmptyDimension {
        /// Axis name (`"x"`, `"y"` or `"z"`).
        axis: &'static str,
        /// The offending value.
        value: i32,
    },
    /// A grid spacing is zero, negative, or not finite.
    InvalidSpacing {
        /// Axis name (`"x"`, `"y"` or `"z"`).
        axis: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A grid origin coordinate is not finite.
    InvalidOrigin {
        /// Axis name (`"x"`, `"y"` or `"z"`).
        axis: &'static str,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { axis, value } => {
                write!(f, "grid dimension L{axis} = {value} must be >= 1")
            }
            Self::InvalidSpacing { axis, value } => {
                write!(f, "grid spacing d{axis} = {value} must be finite and > 0")
            }
            Self::InvalidOrigin { axis, value } => {
                write!(f, "grid origin {axis}0 = {value} must be finite")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Errors from [`Box3`](crate::Box3) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoxError {
    /// `low > high` along some axis.
    InvertedRange {
        /// The axis (0, 1 or 2) where the range is inverted.
        axis: usize,
        /// The low bound on that axis.
        low: i32,
        /// The high bound on that axis.
        high: i32,
    },
}

impl fmt::Display for BoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedRange { axis, low, high } => {
                write!(f, "box range inverted on axis {axis}: low {low} > high {high}")
            }
        }
    }
}

impl std::error::Error for BoxError {}
