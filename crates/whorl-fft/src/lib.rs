//! Serial spectral engine.
//!
//! [`SerialSpectralEngine`] implements the
//! [`SpectralEngine`](whorl_model::SpectralEngine) contract for the
//! single-worker layout, where the inbox is the whole real grid. The
//! real-to-complex axis (x) runs through `realfft`; the remaining
//! axes are full complex transforms through `rustfft`. Buffers use the
//! same column-major, x-fastest linearization as
//! [`Box3`](whorl_core::Box3) offsets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod serial;

pub use serial::SerialSpectralEngine;
