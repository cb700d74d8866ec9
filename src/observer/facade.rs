//! Typed observer facade over the dispatcher.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::lifecycle::ShutdownSignal;
use crate::observer::dispatcher::{Dispatcher, DispatcherError, DispatcherState, FlushOutcome};
use crate::observer::handler::{Deliver, ErrorSink};

/// Binds a delivery callback and tick interval to a [`Dispatcher`].
pub struct Observer<T, H> {
    dispatcher: Dispatcher<T, H>,
}

impl<T, H> Observer<T, H>
where
    T: Send + 'static,
    H: Deliver<T>,
{
    pub fn new(handler: H, tick: Option<Duration>) -> Self {
        Self {
            dispatcher: Dispatcher::new(handler, tick),
        }
    }

    pub fn with_error_sink(handler: H, tick: Option<Duration>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            dispatcher: Dispatcher::with_error_sink(handler, tick, sink),
        }
    }

    /// Launch the background delivery loop.
    pub fn start(&self, shutdown: ShutdownSignal) -> Result<JoinHandle<()>, DispatcherError> {
        self.dispatcher.start(shutdown)
    }

    pub fn dispatch(&self, event: T) {
        self.dispatcher.dispatch(event);
    }

    /// Request a drain without waiting for it.
    pub fn flush(&self) {
        self.dispatcher.flush();
    }

    /// Drain and wait until delivered or until `cancel` resolves.
    pub async fn wait<C>(&self, cancel: C) -> FlushOutcome
    where
        C: Future<Output = ()>,
    {
        self.dispatcher.flush_and_wait(cancel).await
    }

    /// [`Observer::wait`] bounded by a timeout.
    pub async fn wait_timeout(&self, timeout: Duration) -> FlushOutcome {
        self.wait(tokio::time::sleep(timeout)).await
    }

    pub fn pending(&self) -> usize {
        self.dispatcher.pending()
    }

    pub fn state(&self) -> DispatcherState {
        self.dispatcher.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use crate::observer::handler::DeliveryError;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_flush_then_wait_sees_everything_before_flush() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let d = delivered.clone();
        let handler = move |batch: Vec<u32>| {
            d.lock().unwrap().extend(batch);
            async { Ok::<(), DeliveryError>(()) }
        };

        let observer = Observer::new(handler, Some(Duration::from_secs(3600)));
        let shutdown = Shutdown::new();
        observer.start(shutdown.subscribe()).unwrap();

        for i in 0..100 {
            observer.dispatch(i);
        }
        observer.flush();
        let outcome = observer.wait_timeout(Duration::from_secs(5)).await;

        assert_eq!(outcome, FlushOutcome::Drained);
        assert_eq!(*delivered.lock().unwrap(), (0..100).collect::<Vec<_>>());
        assert_eq!(observer.pending(), 0);
    }

    #[tokio::test]
    async fn test_wait_works_before_start() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let d = delivered.clone();
        let handler = move |batch: Vec<&'static str>| {
            d.lock().unwrap().push(batch);
            async { Ok::<(), DeliveryError>(()) }
        };

        let observer = Observer::new(handler, None);
        assert_eq!(observer.state(), DispatcherState::Idle);
        observer.dispatch("x");

        assert_eq!(observer.wait_timeout(Duration::from_secs(1)).await, FlushOutcome::Drained);
        assert_eq!(*delivered.lock().unwrap(), vec![vec!["x"]]);
    }
}
