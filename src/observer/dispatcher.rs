//! Batch dispatcher.
//!
//! # Responsibilities
//! - Own the event queue
//! - Run the background loop that drains on tick, on flush and on shutdown
//! - Hand each drained batch to the delivery callback exactly once
//!
//! # States
//! ```text
//! Idle → Running: start()
//! Running → Draining: shutdown signal received
//! Draining → Stopped: final drain finished
//! ```
//!
//! # Design Decisions
//! - Deliveries are serialized by an async lock, independent of the queue lock
//! - Flush requests are a single stored permit, so bursts coalesce
//! - Failed batches go to the error sink and are dropped

use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::observer::handler::{Deliver, DeliveryError, ErrorSink, TracingErrorSink};
use crate::observer::queue::EventQueue;

/// Dispatcher lifecycle state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Idle = 0,
    Running = 1,
    Draining = 2,
    Stopped = 3,
}

impl From<u8> for DispatcherState {
    fn from(val: u8) -> Self {
        match val {
            1 => DispatcherState::Running,
            2 => DispatcherState::Draining,
            3 => DispatcherState::Stopped,
            _ => DispatcherState::Idle,
        }
    }
}

/// How a [`Dispatcher::flush_and_wait`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The requested drain finished (delivery succeeded or was reported).
    Drained,
    /// The caller's cancellation won; the drain may still be in flight.
    Cancelled,
}

/// Errors from controlling a dispatcher.
#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error("Dispatcher already started (state: {0:?})")]
    AlreadyStarted(DispatcherState),

    #[error("Dispatcher must be started from within a Tokio runtime")]
    NoRuntime,
}

struct Shared<T, H> {
    queue: EventQueue<T>,
    handler: H,
    sink: Arc<dyn ErrorSink>,
    flush: Notify,
    delivery: AsyncMutex<()>,
    state: AtomicU8,
}

impl<T, H> Shared<T, H>
where
    T: Send + 'static,
    H: Deliver<T>,
{
    fn set_state(&self, state: DispatcherState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Drain the queue and deliver whatever was in it.
    async fn drain_and_deliver(&self) {
        let _guard = self.delivery.lock().await;

        let batch = self.queue.drain_all();
        metrics::record_queue_depth(self.queue.len());
        if batch.is_empty() {
            return;
        }

        let batch_size = batch.len();
        tracing::debug!(batch_size = batch_size, "Delivering batch");

        // The async block defers the call so a panic before the first await is caught too.
        let delivery = AssertUnwindSafe(async { self.handler.deliver(batch).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DeliveryError::Other(panic_message(panic))));

        match delivery {
            Ok(()) => {
                metrics::record_batch_delivered(batch_size);
                tracing::debug!(batch_size = batch_size, "Batch delivered");
            }
            Err(e) => {
                metrics::record_delivery_failure();
                self.sink.record_failure(&e, batch_size);
            }
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("delivery callback panicked: {}", detail)
}

/// Queue plus background delivery loop, generic over the event type.
pub struct Dispatcher<T, H> {
    shared: Arc<Shared<T, H>>,
    tick: Option<Duration>,
}

impl<T, H> Dispatcher<T, H>
where
    T: Send + 'static,
    H: Deliver<T>,
{
    /// Create a dispatcher that logs delivery failures.
    ///
    /// A `None` or zero `tick` disables timed drains; only flushes and
    /// shutdown deliver.
    pub fn new(handler: H, tick: Option<Duration>) -> Self {
        Self::with_error_sink(handler, tick, Arc::new(TracingErrorSink))
    }

    /// Create a dispatcher reporting delivery failures to `sink`.
    pub fn with_error_sink(handler: H, tick: Option<Duration>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: EventQueue::new(),
                handler,
                sink,
                flush: Notify::new(),
                delivery: AsyncMutex::new(()),
                state: AtomicU8::new(DispatcherState::Idle as u8),
            }),
            tick: tick.filter(|d| !d.is_zero()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DispatcherState {
        DispatcherState::from(self.shared.state.load(Ordering::Acquire))
    }

    /// The configured tick interval, if timed drains are enabled.
    pub fn tick(&self) -> Option<Duration> {
        self.tick
    }

    /// Spawn the background loop on the current Tokio runtime.
    ///
    /// The loop runs until `shutdown` fires, then performs one last drain.
    pub fn start(&self, shutdown: ShutdownSignal) -> Result<JoinHandle<()>, DispatcherError> {
        let runtime = Handle::try_current().map_err(|_| DispatcherError::NoRuntime)?;

        self.shared
            .state
            .compare_exchange(
                DispatcherState::Idle as u8,
                DispatcherState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| DispatcherError::AlreadyStarted(DispatcherState::from(current)))?;

        let shared = self.shared.clone();
        Ok(runtime.spawn(run_loop(shared, self.tick, shutdown)))
    }

    /// Queue an item. Never blocks on delivery.
    pub fn dispatch(&self, item: T) {
        self.shared.queue.enqueue(item);
        metrics::record_dispatched();
    }

    /// Ask the loop to drain at its next opportunity.
    ///
    /// Does nothing observable until the loop runs; calls made before it
    /// wakes collapse into one drain.
    pub fn flush(&self) {
        self.shared.flush.notify_one();
    }

    /// Drain now and wait for the delivery, or for `cancel`, whichever first.
    ///
    /// Works in every state, including after the loop stopped. Must be called
    /// from within a Tokio runtime.
    pub async fn flush_and_wait<C>(&self, cancel: C) -> FlushOutcome
    where
        C: Future<Output = ()>,
    {
        let shared = self.shared.clone();
        let drain = tokio::spawn(async move { shared.drain_and_deliver().await });

        tokio::select! {
            biased;
            _ = cancel => {
                tracing::debug!("Flush wait cancelled before drain completed");
                FlushOutcome::Cancelled
            }
            res = drain => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "Drain task did not complete");
                }
                FlushOutcome::Drained
            }
        }
    }

    /// Number of items waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Direct access to the underlying queue.
    pub fn queue(&self) -> &EventQueue<T> {
        &self.shared.queue
    }
}

async fn run_loop<T, H>(shared: Arc<Shared<T, H>>, tick: Option<Duration>, mut shutdown: ShutdownSignal)
where
    T: Send + 'static,
    H: Deliver<T>,
{
    tracing::info!(
        tick = ?tick,
        "Dispatcher loop starting"
    );

    let mut ticker = tick.map(|period| {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        tokio::select! {
            _ = next_tick(&mut ticker) => {
                shared.drain_and_deliver().await;
            }
            _ = shared.flush.notified() => {
                shared.drain_and_deliver().await;
            }
            _ = shutdown.cancelled() => {
                tracing::info!("Dispatcher received shutdown signal, draining");
                break;
            }
        }
    }

    shared.set_state(DispatcherState::Draining);
    shared.drain_and_deliver().await;
    shared.set_state(DispatcherState::Stopped);

    tracing::info!("Dispatcher loop stopped");
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
