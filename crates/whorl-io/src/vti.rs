//! VTK ImageData writer with a leader-written header.
//!
//! One `.vti` file per save index holds every worker's sub-box. The
//! first 1024 bytes are reserved for the XML header; the raw
//! little-endian payload follows, with each worker seek-writing its
//! x-runs at the global column-major offsets. Only after the group
//! barrier confirms that all payload writes are complete does rank 0
//! write the header, the `_` + payload-size marker, and the closing
//! tags, so a reader can never observe a valid header over a torn
//! payload.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use whorl_domain::GroupHandle;

use crate::domain::{DataType, WriterDomain};
use crate::error::WriteError;
use crate::ResultsWriter;

/// Bytes reserved at the start of the file for the XML header.
pub const HEADER_SIZE: u64 = 1024;

/// The `_` marker plus the u64 payload size that precede the payload.
const MARKER_SIZE: u64 = 9;

/// VTK ImageData results writer.
pub struct VtiWriter {
    dir: PathBuf,
    group: Arc<GroupHandle>,
    domain: Option<WriterDomain>,
}

impl VtiWriter {
    /// Writer placing its files under `dir`, synchronized through the
    /// given worker-group handle.
    pub fn new(dir: impl Into<PathBuf>, group: Arc<GroupHandle>) -> Self {
        Self {
            dir: dir.into(),
            group,
            domain: None,
        }
    }

    /// Path of the file for one save index.
    pub fn path_for(&self, save_index: usize) -> Result<PathBuf, WriteError> {
        let domain = self.domain.as_ref().ok_or(WriteError::NotConfigured)?;
        Ok(self
            .dir
            .join(format!("{}_{save_index:04}.vti", domain.field_name)))
    }

    fn io_err(path: &Path, source: std::io::Error) -> WriteError {
        WriteError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn header_xml(domain: &WriterDomain) -> String {
        let [gx, gy, gz] = domain.global_dims;
        let extent = format!("0 {} 0 {} 0 {}", gx - 1, gy - 1, gz - 1);
        let [ox, oy, oz] = domain.origin;
        let [sx, sy, sz] = domain.spacing;
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
                "<VTKFile type=\"ImageData\" version=\"1.0\" byte_order=\"LittleEndian\" header_type=\"UInt64\">\n",
                "  <ImageData WholeExtent=\"{extent}\" Origin=\"{ox} {oy} {oz}\" Spacing=\"{sx} {sy} {sz}\">\n",
                "    <Piece Extent=\"{extent}\">\n",
                "      <PointData>\n",
                "        <DataArray type=\"{ty}\" Name=\"{name}\" NumberOfComponents=\"1\" format=\"appended\" offset=\"0\"/>\n",
                "      </PointData>\n",
                "    </Piece>\n",
                "  </ImageData>\n",
                "  <AppendedData encoding=\"raw\">\n",
            ),
            extent = extent,
            ox = ox,
            oy = oy,
            oz = oz,
            sx = sx,
            sy = sy,
            sz = sz,
            ty = DataType::Float64.name(),
            name = domain.field_name,
        )
    }
}

impl ResultsWriter for VtiWriter {
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
        let payload_size = (domain.global_len() * value_size) as u64;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| Self::io_err(&path, e))?;

        // The leader sizes the file (truncating any stale artifact)
        // before the barrier releases the payload writes.
        if self.group.is_leader() {
            file.set_len(HEADER_SIZE + payload_size)
                .map_err(|e| Self::io_err(&path, e))?;
        }
        self.group.barrier()?;

        let [lx, ly, lz] = domain.local_dims;
        let mut run = Vec::with_capacity(lx * value_size);
        for k in 0..lz {
            for j in 0..ly {
                run.clear();
                for value in &data[lx * (j + ly * k)..lx * (j + ly * k) + lx] {
                    run.extend_from_slice(&value.to_le_bytes());
                }
                let at = HEADER_SIZE + domain.run_byte_offset(j, k, value_size);
                file.seek(SeekFrom::Start(at))
                    .map_err(|e| Self::io_err(&path, e))?;
                file.write_all(&run).map_err(|e| Self::io_err(&path, e))?;
            }
        }
        file.flush().map_err(|e| Self::io_err(&path, e))?;

        // All sub-box payloads must be on disk before the header makes
        // the file readable.
        self.group.barrier()?;

        if self.group.is_leader() {
            let xml = Self::header_xml(domain);
            let reserved = (HEADER_SIZE - MARKER_SIZE) as usize;
            if xml.len() > reserved {
                return Err(WriteError::HeaderOverflow {
                    len: xml.len(),
                    reserved,
                });
            }
            file.seek(SeekFrom::Start(0))
                .map_err(|e| Self::io_err(&path, e))?;
            file.write_all(xml.as_bytes())
                .map_err(|e| Self::io_err(&path, e))?;

            file.seek(SeekFrom::Start(HEADER_SIZE - MARKER_SIZE))
                .map_err(|e| Self::io_err(&path, e))?;
            file.write_all(b"_").map_err(|e| Self::io_err(&path, e))?;
            file.write_all(&payload_size.to_le_bytes())
                .map_err(|e| Self::io_err(&path, e))?;

            file.seek(SeekFrom::Start(HEADER_SIZE + payload_size))
                .map_err(|e| Self::io_err(&path, e))?;
            file.write_all(b"  </AppendedData>\n</VTKFile>\n")
                .map_err(|e| Self::io_err(&path, e))?;
            file.flush().map_err(|e| Self::io_err(&path, e))?;
        }
        Ok(())
    }
}
