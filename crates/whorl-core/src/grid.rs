//! Immutable description of the global simulation grid.

use crate::error::GridError;
use std::fmt;

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Immutable description of the global regular 3-D grid: dimensions,
/// origin, and spacing.
///
/// Created once per simulation and read-only thereafter. All workers
/// must construct it from identical inputs; the decomposition derives
/// every per-worker layout from this object deterministically.
///
/// # Examples
///
/// ```
/// use whorl_core::GridDescriptor;
///
/// let grid = GridDescriptor::new([4, 3, 2], [0.0; 3], [1.0; 3]).unwrap();
/// assert_eq!(grid.dims(), [4, 3, 2]);
/// assert_eq!(grid.point_count(), 24);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridDescriptor {
    dims: [i32; 3],
    origin: [f64; 3],
    spacing: [f64; 3],
}

impl GridDescriptor {
    /// Create a grid descriptor, validating all fields.
    ///
    /// Every dimension must be `>= 1`, every spacing finite and `> 0`,
    /// every origin coordinate finite. Fails with [`GridError`]
    /// otherwise.
    pub fn new(dims: [i32; 3], origin: [f64; 3], spacing: [f64; 3]) -> Result<Self, GridError> {
        for axis in 0..3 {
            if dims[axis] < 1 {
                return Err(GridError::EmptyDimension {
                    axis: AXIS_NAMES[axis],
                    value: dims[axis],
                });
            }
            if !spacing[axis].is_finite() || spacing[axis] <= 0.0 {
                return Err(GridError::InvalidSpacing {
                    axis: AXIS_NAMES[axis],
                    value: spacing[axis],
                });
            }
            if !origin[axis].is_finite() {
                return Err(GridError::InvalidOrigin {
                    axis: AXIS_NAMES[axis],
                    value: origin[axis],
                });
            }
        }
        Ok(Self {
            dims,
            origin,
            spacing,
        })
    }

    /// Grid with unit spacing and the origin at zero.
    pub fn with_unit_spacing(dims: [i32; 3]) -> Result<Self, GridError> {
        Self::new(dims, [0.0; 3], [1.0; 3])
    }

    /// Grid dimensions `[Lx, Ly, Lz]`.
    pub fn dims(&self) -> [i32; 3] {
        self.dims
    }

    /// Physical origin `[x0, y0, z0]`.
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Grid spacing `[dx, dy, dz]`.
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Number of grid points along `axis`.
    pub fn dim(&self, axis: usize) -> i32 {
        self.dims[axis]
    }

    /// Total number of grid points.
    pub fn point_count(&self) -> usize {
        self.dims.iter().map(|&d| d as usize).product()
    }

    /// Physical coordinate of the grid point with index `[i, j, k]`.
    pub fn coord(&self, index: [i32; 3]) -> [f64; 3] {
        [
            self.origin[0] + f64::from(index[0]) * self.spacing[0],
            self.origin[1] + f64::from(index[1]) * self.spacing[1],
            self.origin[2] + f64::from(index[2]) * self.spacing[2],
        ]
    }

    /// Discrete wavenumber for spectral index `i` along `axis`.
    ///
    /// For axis size `L` and spacing `h`, the fundamental frequency is
    /// `f = 2π/(h·L)` and `k(i) = i·f` for `i <= L/2`, `(i - L)·f`
    /// otherwise. This is the mapping used to evaluate spectral
    /// operators over a worker's outbox.
    pub fn wavenumber(&self, axis: usize, index: i32) -> f64 {
        let l = self.dims[axis];
        let f = 2.0 * std::f64::consts::PI / (self.spacing[axis] * f64::from(l));
        if index <= l / 2 {
            f64::from(index) * f
        } else {
            f64::from(index - l) * f
        }
    }

    /// Squared wavenumber magnitude `kx² + ky² + kz²` for the spectral
    /// index `[i, j, k]`.
    pub fn wavenumber_squared(&self, index: [i32; 3]) -> f64 {
        let kx = self.wavenumber(0, index[0]);
        let ky = self.wavenumber(1, index[1]);
        let kz = self.wavenumber(2, index[2]);
        kx * kx + ky * ky + kz * kz
    }
}

impl fmt::Display for GridDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(Lx = {}, Ly = {}, Lz = {}, x0 = {}, y0 = {}, z0 = {}, dx = {}, dy = {}, dz = {})",
            self.dims[0],
            self.dims[1],
            self.dims[2],
            self.origin[0],
            self.origin[1],
            self.origin[2],
            self.spacing[0],
            self.spacing[1],
            self.spacing[2],
        )
    }
}
