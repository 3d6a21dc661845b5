//! Time control and simulation orchestration.
//!
//! [`TimeController`] tracks simulation time, decides termination, and
//! schedules result saves; [`Simulator`] drives a model through the
//! initialize/step lifecycle, applies initial and boundary conditions
//! in registration order, and fans field snapshots out to the
//! registered results writers on the save cadence.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod metrics;
pub mod simulator;
pub mod time;

pub use metrics::StepMetrics;
pub use simulator::{Simulator, SimulatorError};
pub use time::{SaveSchedule, TimeController, TimeError};
