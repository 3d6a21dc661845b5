//! Contract for the external spectral transform engine.

use num_complex::Complex64;
use whorl_core::Box3;

use crate::error::TransformError;

/// Normalization applied by a backward transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Raw inverse transform, no normalization.
    None,
    /// Divide by the global point count so that `backward(forward(u))`
    /// reproduces `u` up to floating-point rounding.
    Full,
}

/// Real-to-complex transform over a worker's `(inbox, outbox)` pair.
///
/// Implementations are collective across the worker group: no worker
/// may proceed past a transform call until every worker has invoked
/// the matching call. The engine operates over exactly the boxes the
/// decomposition established; buffer lengths are validated against
/// them.
pub trait SpectralEngine {
    /// Real-space box this engine transforms from.
    fn inbox(&self) -> Box3;

    /// Spectral-space box this engine transforms to.
    fn outbox(&self) -> Box3;

    /// Required length of real-space buffers.
    fn len_inbox(&self) -> usize {
        self.inbox().volume()
    }

    /// Required length of spectral-space buffers.
    fn len_outbox(&self) -> usize {
        self.outbox().volume()
    }

    /// Scratch capacity the engine holds internally.
    fn len_workspace(&self) -> usize;

    /// Transforms `real` (inbox layout) into `spectral` (outbox
    /// layout). `real` is left untouched.
    fn forward(&mut self, real: &[f64], spectral: &mut [Complex64]) -> Result<(), TransformError>;

    /// Transforms `spectral` (outbox layout) into `real` (inbox
    /// layout), applying `scale`.
    fn backward(
        &mut self,
        spectral: &[Complex64],
        real: &mut [f64],
        scale: Scale,
    ) -> Result<(), TransformError>;
}
