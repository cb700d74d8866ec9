//! Observability for the SDK itself.
//!
//! # Data Flow
//! ```text
//! observer / api subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - The SDK never installs a global subscriber or recorder on its own
//! - Delivery failures are logged, never returned to instrumented code

pub mod logging;
pub mod metrics;
