//! Headerless strided binary writer.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::domain::{DataType, WriterDomain};
use crate::error::WriteError;
use crate::ResultsWriter;

/// Writes each snapshot as one raw little-endian `Float64` file, every
/// worker seek-writing its x-runs at the global column-major offsets.
///
/// The artifact is headerless, so no leader coordination is needed;
/// concurrent workers touch disjoint byte ranges.
pub struct RawBinaryWriter {
    dir: PathBuf,
    domain: Option<WriterDomain>,
}

impl RawBinaryWriter {
    /// Writer that places its files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            domain: None,
        }
    }

    /// Path of the file for one save index.
    pub fn path_for(&self, save_index: usize) -> Result<PathBuf, WriteError> {
        let domain = self.domain.as_ref().ok_or(WriteError::NotConfigured)?;
        Ok(self
            .dir
            .join(format!("{}_{save_index:04}.bin", domain.field_name)))
    }

    fn io_err(path: &Path, source: std::io::Error) -> WriteError {
        WriteError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ResultsWriter for RawBinaryWriter {
    fn configure(&mut self, domain: &WriterDomain) -> Result<(), WriteError> {
        self.domain = Some(domain.clone());
        Ok(())
    }

    fn write(&mut self, save_index: usize, data: &[f64]) -> Result<(), WriteError> {
        let path = self.path_for(save_index)?;
        let domain = self.domain.as_ref().ok_or(WriteError::NotConfigured)?;
        if data.len() != domain.local_len() {
            return Err(WriteError::SizeMismatch {
                len: data.len(),
                expected: domain.local_len(),
            });
        }

        let value_size = DataType::Float64.size_bytes();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| Self::io_err(&path, e))?;
        // Identical on every worker, so concurrent calls agree.
        file.set_len((domain.global_len() * value_size) as u64)
            .map_err(|e| Self::io_err(&path, e))?;

        let [lx, ly, lz] = domain.local_dims;
        let mut run = Vec::with_capacity(lx * value_size);
        for k in 0..lz {
            for j in 0..ly {
                run.clear();
                for value in &data[lx * (j + ly * k)..lx * (j + ly * k) + lx] {
                    run.extend_from_slice(&value.to_le_bytes());
                }
                file.seek(SeekFrom::Start(domain.run_byte_offset(j, k, value_size)))
                    .map_err(|e| Self::io_err(&path, e))?;
                file.write_all(&run).map_err(|e| Self::io_err(&path, e))?;
            }
        }
        file.flush().map_err(|e| Self::io_err(&path, e))?;
        Ok(())
    }
}
