//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Owner creates Shutdown
//!     → subscribe() hands a ShutdownSignal to each background loop
//!     → trigger() on process exit
//!     → loops perform their final drain and stop
//! ```
//!
//! # Design Decisions
//! - Signal is level-triggered: late subscribers still observe shutdown
//! - Dropping the coordinator without triggering never fires the signal

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
