//! Delivery callback and failure reporting contracts.

use std::future::Future;
use thiserror::Error;

/// Error returned by a delivery callback.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote end answered with a non-success status.
    #[error("Batch rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Anything else the callback wants to report.
    #[error("Delivery failed: {0}")]
    Other(String),
}

/// Ships one drained batch to its destination.
///
/// Implementations make a single attempt. The dispatcher never retries and
/// never re-enqueues a batch whose delivery failed. Shutdown does not
/// interrupt a delivery in progress; bound it with a transport timeout.
pub trait Deliver<T>: Send + Sync + 'static {
    fn deliver(&self, batch: Vec<T>) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

impl<T, F, Fut> Deliver<T> for F
where
    F: Fn(Vec<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DeliveryError>> + Send,
{
    fn deliver(&self, batch: Vec<T>) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (self)(batch)
    }
}

/// Destination for delivery failures.
///
/// Failed batches are dropped after being reported here.
pub trait ErrorSink: Send + Sync + 'static {
    fn record_failure(&self, error: &DeliveryError, batch_size: usize);
}

/// Default sink: logs the failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn record_failure(&self, error: &DeliveryError, batch_size: usize) {
        tracing::error!(
            batch_size = batch_size,
            error = %error,
            "Batch delivery failed, dropping events"
        );
    }
}
