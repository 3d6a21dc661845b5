//! Error type for results writing.

use std::fmt;
use std::io;
use std::path::PathBuf;

use whorl_domain::CollectiveError;

/// Errors from results writers. All are fatal to the worker group: a
/// partially written shared artifact cannot be reconciled.
#[derive(Debug)]
pub enum WriteError {
    /// `write` was called before `configure`.
    NotConfigured,
    /// The snapshot length does not match the configured local box.
    SizeMismatch {
        /// Length of the supplied snapshot.
        len: usize,
        /// Local box volume the writer was configured with.
        expected: usize,
    },
    /// An operation on the results file failed.
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
    /// The artifact header does not fit in its reserved region.
    HeaderOverflow {
        /// Rendered header length in bytes.
        len: usize,
        /// Reserved region size in bytes.
        reserved: usize,
    },
    /// The pre-header group barrier failed.
    Collective(CollectiveError),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "writer used before configure"),
            Self::SizeMismatch { len, expected } => {
                write!(f, "snapshot has {len} values, local box holds {expected}")
            }
            Self::Io { path, source } => {
                write!(f, "writing {}: {source}", path.display())
            }
            Self::HeaderOverflow { len, reserved } => {
                write!(f, "{len}-byte header exceeds the {reserved}-byte reserved region")
            }
            Self::Collective(e) => write!(f, "write barrier failed: {e}"),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Collective(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CollectiveError> for WriteError {
    fn from(e: CollectiveError) -> Self {
        Self::Collective(e)
    }
}
