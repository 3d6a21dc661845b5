//! Single-worker 3-D real-to-complex transform.

use std::sync::Arc;

use num_complex::Complex64;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

use whorl_core::{Box3, GridDescriptor};
use whorl_model::{Scale, SpectralEngine, TransformError};

/// 3-D r2c transform over the full grid of a single worker.
///
/// The forward transform is unnormalized; a backward transform with
/// [`Scale::Full`] divides by the global point count and therefore
/// exactly inverts a preceding forward up to rounding.
pub struct SerialSpectralEngine {
    inbox: Box3,
    outbox: Box3,
    /// Real extents `[nx, ny, nz]`.
    dims: [usize; 3],
    /// Spectral extents `[nx/2 + 1, ny, nz]`.
    cdims: [usize; 3],
    r2c: Arc<dyn RealToComplex<f64>>,
    c2r: Arc<dyn ComplexToReal<f64>>,
    fft_y_fwd: Arc<dyn Fft<f64>>,
    fft_y_inv: Arc<dyn Fft<f64>>,
    fft_z_fwd: Arc<dyn Fft<f64>>,
    fft_z_inv: Arc<dyn Fft<f64>>,
    real_lane: Vec<f64>,
    spec_lane: Vec<Complex64>,
    lane_y: Vec<Complex64>,
    lane_z: Vec<Complex64>,
    spec_work: Vec<Complex64>,
}

impl std::fmt::Debug for SerialSpectralEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSpectralEngine")
            .field("inbox", &self.inbox)
            .field("outbox", &self.outbox)
            .field("dims", &self.dims)
            .field("cdims", &self.cdims)
            .finish_non_exhaustive()
    }
}

impl SerialSpectralEngine {
    /// Creates an engine over the whole grid.
    pub fn new(grid: &GridDescriptor) -> Result<Self, TransformError> {
        let inbox = Box3::from_dims(grid.dims()).map_err(|e| TransformError::Layout {
            detail: format!("global real box: {e}"),
        })?;
        let outbox = inbox.r2c(0).ok_or_else(|| TransformError::Layout {
            detail: "global complex box is empty".to_owned(),
        })?;

        let ext = inbox.extents();
        let dims = [ext[0] as usize, ext[1] as usize, ext[2] as usize];
        let cdims = [dims[0] / 2 + 1, dims[1], dims[2]];

        let mut real_planner = RealFftPlanner::<f64>::new();
        let mut planner = FftPlanner::<f64>::new();
        let n_spec = cdims[0] * cdims[1] * cdims[2];
        Ok(Self {
            inbox,
            outbox,
            dims,
            cdims,
            r2c: real_planner.plan_fft_forward(dims[0]),
            c2r: real_planner.plan_fft_inverse(dims[0]),
            fft_y_fwd: planner.plan_fft_forward(dims[1]),
            fft_y_inv: planner.plan_fft_inverse(dims[1]),
            fft_z_fwd: planner.plan_fft_forward(dims[2]),
            fft_z_inv: planner.plan_fft_inverse(dims[2]),
            real_lane: vec![0.0; dims[0]],
            spec_lane: vec![Complex64::default(); cdims[0]],
            lane_y: vec![Complex64::default(); dims[1]],
            lane_z: vec![Complex64::default(); dims[2]],
            spec_work: vec![Complex64::default(); n_spec],
        })
    }

    /// Creates an engine for one worker of a decomposition, which for
    /// the serial engine must own the whole grid.
    pub fn for_worker(grid: &GridDescriptor, inbox: Box3) -> Result<Self, TransformError> {
        let engine = Self::new(grid)?;
        if inbox != engine.inbox {
            return Err(TransformError::Layout {
                detail: format!(
                    "serial engine covers the whole grid {}, cannot serve inbox {}",
                    engine.inbox, inbox
                ),
            });
        }
        Ok(engine)
    }

    fn check_real(&self, real: &[f64]) -> Result<(), TransformError> {
        let expected = self.len_inbox();
        if real.len() != expected {
            return Err(TransformError::SizeMismatch {
                buffer: "real",
                len: real.len(),
                expected,
            });
        }
        Ok(())
    }

    fn check_spectral(&self, spectral: &[Complex64]) -> Result<(), TransformError> {
        let expected = self.len_outbox();
        if spectral.len() != expected {
            return Err(TransformError::SizeMismatch {
                buffer: "spectral",
                len: spectral.len(),
                expected,
            });
        }
        Ok(())
    }

    /// In-place complex FFT along y over every (x, z) lane of `buf`,
    /// which has nxc-fastest layout.
    fn pass_y(&mut self, buf: &mut [Complex64], fft: &Arc<dyn Fft<f64>>) {
        let [nxc, ny, _] = self.cdims;
        for k in 0..self.cdims[2] {
            for i in 0..nxc {
                for t in 0..ny {
                    self.lane_y[t] = buf[i + nxc * (t + ny * k)];
                }
                fft.process(&mut self.lane_y);
                for t in 0..ny {
                    buf[i + nxc * (t + ny * k)] = self.lane_y[t];
                }
            }
        }
    }

    /// In-place complex FFT along z over every (x, y) lane of `buf`.
    fn pass_z(&mut self, buf: &mut [Complex64], fft: &Arc<dyn Fft<f64>>) {
        let [nxc, ny, nz] = self.cdims;
        for j in 0..ny {
            for i in 0..nxc {
                for t in 0..nz {
                    self.lane_z[t] = buf[i + nxc * (j + ny * t)];
                }
                fft.process(&mut self.lane_z);
                for t in 0..nz {
                    buf[i + nxc * (j + ny * t)] = self.lane_z[t];
                }
            }
        }
    }
}

impl SpectralEngine for SerialSpectralEngine {
    fn inbox(&self) -> Box3 {
        self.inbox
    }

    fn outbox(&self) -> Box3 {
        self.outbox
    }

    fn len_workspace(&self) -> usize {
        self.real_lane.len()
            + self.spec_lane.len()
            + self.lane_y.len()
            + self.lane_z.len()
            + self.spec_work.len()
    }

    fn forward(&mut self, real: &[f64], spectral: &mut [Complex64]) -> Result<(), TransformError> {
        self.check_real(real)?;
        self.check_spectral(spectral)?;

        let [nx, ny, nz] = self.dims;
        let nxc = self.cdims[0];
        for lane in 0..ny * nz {
            self.real_lane.copy_from_slice(&real[lane * nx..(lane + 1) * nx]);
            self.r2c
                .process(&mut self.real_lane, &mut spectral[lane * nxc..(lane + 1) * nxc])
                .map_err(|e| TransformError::Backend {
                    detail: e.to_string(),
                })?;
        }

        let fft_y = Arc::clone(&self.fft_y_fwd);
        self.pass_y(spectral, &fft_y);
        let fft_z = Arc::clone(&self.fft_z_fwd);
        self.pass_z(spectral, &fft_z);
        Ok(())
    }

    fn backward(
        &mut self,
        spectral: &[Complex64],
        real: &mut [f64],
        scale: Scale,
    ) -> Result<(), TransformError> {
        self.check_spectral(spectral)?;
        self.check_real(real)?;

        self.spec_work.copy_from_slice(spectral);
        let mut work = std::mem::take(&mut self.spec_work);
        let fft_z = Arc::clone(&self.fft_z_inv);
        self.pass_z(&mut work, &fft_z);
        let fft_y = Arc::clone(&self.fft_y_inv);
        self.pass_y(&mut work, &fft_y);

        let [nx, ny, nz] = self.dims;
        let nxc = self.cdims[0];
        for lane in 0..ny * nz {
            self.spec_lane.copy_from_slice(&work[lane * nxc..(lane + 1) * nxc]);
            // The r2c symmetry requires purely real DC (and Nyquist,
            // for even nx) components; rounding in the y/z passes
            // leaves them with tiny imaginary parts that realfft
            // rejects.
            self.spec_lane[0].im = 0.0;
            if nx % 2 == 0 {
                self.spec_lane[nxc - 1].im = 0.0;
            }
            self.c2r
                .process(&mut self.spec_lane, &mut real[lane * nx..(lane + 1) * nx])
                .map_err(|e| TransformError::Backend {
                    detail: e.to_string(),
                })?;
        }
        self.spec_work = work;

        if scale == Scale::Full {
            let norm = 1.0 / (nx * ny * nz) as f64;
            for u in real.iter_mut() {
                *u *= norm;
            }
        }
        Ok(())
    }
}
