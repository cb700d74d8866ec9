//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; they cost nothing unless the host
//! application installs a recorder.
//!
//! # Metrics
//! - `langfuse_events_dispatched_total` (counter): envelopes queued
//! - `langfuse_batches_delivered_total` (counter): successful deliveries
//! - `langfuse_events_delivered_total` (counter): envelopes in those batches
//! - `langfuse_delivery_failures_total` (counter): failed, dropped batches
//! - `langfuse_queue_depth` (gauge): items left after the latest drain

use metrics::{counter, gauge};

pub fn record_dispatched() {
    counter!("langfuse_events_dispatched_total").increment(1);
}

pub fn record_batch_delivered(batch_size: usize) {
    counter!("langfuse_batches_delivered_total").increment(1);
    counter!("langfuse_events_delivered_total").increment(batch_size as u64);
}

pub fn record_delivery_failure() {
    counter!("langfuse_delivery_failures_total").increment(1);
}

pub fn record_queue_depth(depth: usize) {
    gauge!("langfuse_queue_depth").set(depth as f64);
}
