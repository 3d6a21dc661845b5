//! Writer configuration: one worker's slice of the global domain.

use whorl_core::GridDescriptor;
use whorl_domain::Decomposition;

/// VTK-style data type names for header metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
}

impl DataType {
    /// The name used in artifact headers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
        }
    }

    /// Size of one value in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            Self::Float32 | Self::Int32 | Self::UInt32 => 4,
            Self::Float64 | Self::Int64 | Self::UInt64 => 8,
        }
    }
}

/// Everything a writer needs to place one worker's sub-box inside the
/// global artifact.
#[derive(Clone, Debug, PartialEq)]
pub struct WriterDomain {
    /// Global grid dimensions.
    pub global_dims: [usize; 3],
    /// This worker's local box dimensions.
    pub local_dims: [usize; 3],
    /// This worker's offset inside the global box.
    pub local_offset: [usize; 3],
    /// Physical origin of the grid.
    pub origin: [f64; 3],
    /// Grid spacing.
    pub spacing: [f64; 3],
    /// Name of the field being written.
    pub field_name: String,
}

impl WriterDomain {
    /// Builds the domain for one worker of a decomposition.
    pub fn from_decomposition(decomposition: &Decomposition, field_name: impl Into<String>) -> Self {
        let grid: &GridDescriptor = decomposition.grid();
        Self {
            global_dims: decomposition.global_dims(),
            local_dims: decomposition.local_dims(),
            local_offset: decomposition.local_offset(),
            origin: grid.origin(),
            spacing: grid.spacing(),
            field_name: field_name.into(),
        }
    }

    /// Number of points in the global box.
    pub fn global_len(&self) -> usize {
        self.global_dims.iter().product()
    }

    /// Number of points in the local box.
    pub fn local_len(&self) -> usize {
        self.local_dims.iter().product()
    }

    /// Byte offset of the local x-run `(j, k)` inside the raw global
    /// payload, for values of width `value_size` stored x-fastest.
    pub fn run_byte_offset(&self, j: usize, k: usize, value_size: usize) -> u64 {
        let [gx, gy, _] = self.global_dims;
        let [ox, oy, oz] = self.local_offset;
        let point = ox + gx * ((oy + j) + gy * (oz + k));
        (point * value_size) as u64
    }
}
