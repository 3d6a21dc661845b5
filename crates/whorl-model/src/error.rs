//! Error types for model lifecycle and spectral transforms.

use std::fmt;

use whorl_field::FieldError;

/// Errors from spectral transform calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// A transform buffer does not match the engine's expected length.
    SizeMismatch {
        /// Which buffer ("real" or "spectral").
        buffer: &'static str,
        /// Length supplied by the caller.
        len: usize,
        /// Length the engine requires.
        expected: usize,
    },
    /// The engine cannot serve the requested box layout.
    Layout {
        /// What about the layout is unsupported.
        detail: String,
    },
    /// The underlying transform library reported a failure.
    Backend {
        /// The library's error message.
        detail: String,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch {
                buffer,
                len,
                expected,
            } => write!(
                f,
                "{buffer} buffer has {len} elements, transform requires {expected}"
            ),
            Self::Layout { detail } => write!(f, "unsupported transform layout: {detail}"),
            Self::Backend { detail } => write!(f, "transform backend failed: {detail}"),
        }
    }
}

impl std::error::Error for TransformError {}

/// Errors from the model lifecycle contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// `initialize` was called more than once.
    AlreadyInitialized,
    /// `step` (or another post-initialize operation) was called before
    /// `initialize`.
    NotInitialized,
    /// The requested field name was never registered.
    UnknownField {
        /// The name that failed to resolve.
        name: String,
    },
    /// A spectral transform inside `step` failed.
    Transform(TransformError),
    /// A field access inside the model failed.
    Field(FieldError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "model is already initialized"),
            Self::NotInitialized => write!(f, "model has not been initialized"),
            Self::UnknownField { name } => write!(f, "unknown field '{name}'"),
            Self::Transform(e) => write!(f, "spectral transform failed: {e}"),
            Self::Field(e) => write!(f, "field access failed: {e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transform(e) => Some(e),
            Self::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransformError> for ModelError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}

impl From<FieldError> for ModelError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}
