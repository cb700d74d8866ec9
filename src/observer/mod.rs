//! Batching event pipeline.
//!
//! # Data Flow
//! ```text
//! Observer::dispatch(event)
//!     → queue.rs (enqueue, never blocks)
//!
//! dispatcher.rs background loop, on tick / flush / shutdown:
//!     → queue.rs drain_all()
//!     → handler.rs Deliver::deliver(batch)
//!     → on error: ErrorSink::record_failure, batch dropped
//!
//! Observer::wait(cancel):
//!     → immediate drain raced against cancel
//! ```
//!
//! # Design Decisions
//! - Generic over the event type; no bounds beyond Send
//! - At-most-once delivery: no retry, no re-enqueue
//! - One delivery in flight at a time

pub mod dispatcher;
pub mod facade;
pub mod handler;
pub mod queue;

pub use dispatcher::{Dispatcher, DispatcherError, DispatcherState, FlushOutcome};
pub use facade::Observer;
pub use handler::{Deliver, DeliveryError, ErrorSink, TracingErrorSink};
pub use queue::EventQueue;
