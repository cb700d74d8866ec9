//! Client facade: turns domain calls into queued ingestion envelopes.
//!
//! # Data Flow
//! ```text
//! trace / span / generation / event / score
//!     → fill IDs, auto-create a parent trace when none is given
//!     → IngestionEvent { id, type, timestamp, body }
//!     → Observer::dispatch (returns immediately)
//! ```
//!
//! # Design Decisions
//! - Validation failures are returned before anything is queued
//! - Delivery outcome is never reported back to the caller
//! - Dropping the client triggers shutdown; the loop still does its final drain

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::config::validation::validate_config;
use crate::config::{ConfigError, LangfuseConfig};
use crate::error::{LangfuseError, Result};
use crate::lifecycle::Shutdown;
use crate::model::ingestion::ensure_id;
use crate::model::{
    Event, Generation, GetPromptRequest, IngestionBody, IngestionEvent, IngestionEventType,
    Prompt, Score, Span, Trace,
};
use crate::observer::{Deliver, ErrorSink, FlushOutcome, Observer, TracingErrorSink};

/// Langfuse SDK client.
///
/// Construction spawns the background delivery loop, so it must happen inside
/// a Tokio runtime; otherwise it fails with `DispatcherError::NoRuntime`.
pub struct Langfuse<H = ApiClient> {
    api: ApiClient,
    observer: Observer<IngestionEvent, H>,
    shutdown: Shutdown,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Langfuse<ApiClient> {
    /// Create a client that ships batches to the configured API.
    pub fn new(config: LangfuseConfig) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let api = ApiClient::new(config.api.clone())?;
        Self::build(api.clone(), api, config.flush_interval(), Arc::new(TracingErrorSink))
    }

    /// Create a client configured purely from `LANGFUSE_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::new(LangfuseConfig::default())
    }
}

impl<H> Langfuse<H>
where
    H: Deliver<IngestionEvent>,
{
    /// Create a client whose batches go to `handler` instead of the API.
    ///
    /// The API client is still built from `config` for prompt fetching.
    pub fn with_handler(config: LangfuseConfig, handler: H) -> Result<Self> {
        Self::with_error_sink(config, handler, Arc::new(TracingErrorSink))
    }

    /// Like [`Langfuse::with_handler`], reporting delivery failures to `sink`.
    pub fn with_error_sink(
        config: LangfuseConfig,
        handler: H,
        sink: Arc<dyn ErrorSink>,
    ) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let api = ApiClient::new(config.api.clone())?;
        Self::build(api, handler, config.flush_interval(), sink)
    }

    fn build(
        api: ApiClient,
        handler: H,
        flush_interval: Option<Duration>,
        sink: Arc<dyn ErrorSink>,
    ) -> Result<Self> {
        let observer = Observer::with_error_sink(handler, flush_interval, sink);
        let shutdown = Shutdown::new();
        let worker = observer.start(shutdown.subscribe())?;

        tracing::info!(
            host = %api.host(),
            flush_interval = ?flush_interval,
            "Langfuse client initialized"
        );

        Ok(Self {
            api,
            observer,
            shutdown,
            worker: Mutex::new(Some(worker)),
        })
    }

    fn enqueue(&self, event_type: IngestionEventType, body: IngestionBody) {
        let event = IngestionEvent::new(event_type, body);
        tracing::trace!(event_id = %event.id, event_type = ?event_type, "Event queued");
        self.observer.dispatch(event);
    }

    fn create_trace(&self, name: Option<String>) -> String {
        self.trace(Trace {
            name,
            ..Default::default()
        })
        .id
    }

    /// Record a new trace.
    pub fn trace(&self, mut trace: Trace) -> Trace {
        ensure_id(&mut trace.id);
        self.enqueue(IngestionEventType::TraceCreate, IngestionBody::Trace(trace.clone()));
        trace
    }

    /// Update an existing trace; the server upserts by ID.
    pub fn update_trace(&self, trace: Trace) -> Result<Trace> {
        if trace.id.is_empty() {
            return Err(LangfuseError::MissingField("trace id"));
        }
        self.enqueue(IngestionEventType::TraceCreate, IngestionBody::Trace(trace.clone()));
        Ok(trace)
    }

    /// Start a span, creating a parent trace if `span.trace_id` is empty.
    pub fn span(&self, mut span: Span, parent_id: Option<&str>) -> Span {
        if span.trace_id.is_empty() {
            span.trace_id = self.create_trace(span.name.clone());
        }
        ensure_id(&mut span.id);
        if let Some(parent) = parent_id {
            span.parent_observation_id = Some(parent.to_string());
        }

        self.enqueue(IngestionEventType::SpanCreate, IngestionBody::Span(span.clone()));
        span
    }

    /// Close a span previously returned by [`Langfuse::span`].
    pub fn span_end(&self, span: Span) -> Result<Span> {
        if span.id.is_empty() {
            return Err(LangfuseError::MissingField("span id"));
        }
        if span.trace_id.is_empty() {
            return Err(LangfuseError::MissingField("trace id"));
        }

        self.enqueue(IngestionEventType::SpanUpdate, IngestionBody::Span(span.clone()));
        Ok(span)
    }

    /// Start a generation, creating a parent trace if needed.
    pub fn generation(&self, mut generation: Generation, parent_id: Option<&str>) -> Generation {
        if generation.trace_id.is_empty() {
            generation.trace_id = self.create_trace(generation.name.clone());
        }
        ensure_id(&mut generation.id);
        if let Some(parent) = parent_id {
            generation.parent_observation_id = Some(parent.to_string());
        }

        self.enqueue(
            IngestionEventType::GenerationCreate,
            IngestionBody::Generation(generation.clone()),
        );
        generation
    }

    /// Close a generation previously returned by [`Langfuse::generation`].
    pub fn generation_end(&self, generation: Generation) -> Result<Generation> {
        if generation.id.is_empty() {
            return Err(LangfuseError::MissingField("generation id"));
        }
        if generation.trace_id.is_empty() {
            return Err(LangfuseError::MissingField("trace id"));
        }

        self.enqueue(
            IngestionEventType::GenerationUpdate,
            IngestionBody::Generation(generation.clone()),
        );
        Ok(generation)
    }

    /// Record a point-in-time event, creating a parent trace if needed.
    pub fn event(&self, mut event: Event, parent_id: Option<&str>) -> Event {
        if event.trace_id.is_empty() {
            event.trace_id = self.create_trace(event.name.clone());
        }
        ensure_id(&mut event.id);
        if let Some(parent) = parent_id {
            event.parent_observation_id = Some(parent.to_string());
        }

        self.enqueue(IngestionEventType::EventCreate, IngestionBody::Event(event.clone()));
        event
    }

    /// Attach a score to an existing trace.
    pub fn score(&self, mut score: Score) -> Result<Score> {
        if score.trace_id.is_empty() {
            return Err(LangfuseError::MissingField("trace id"));
        }
        ensure_id(&mut score.id);

        self.enqueue(IngestionEventType::ScoreCreate, IngestionBody::Score(score.clone()));
        Ok(score)
    }

    /// Deliver everything queued so far, waiting until done or `cancel` fires.
    pub async fn flush<C>(&self, cancel: C) -> FlushOutcome
    where
        C: Future<Output = ()>,
    {
        self.observer.wait(cancel).await
    }

    /// [`Langfuse::flush`] bounded by a timeout.
    pub async fn flush_timeout(&self, timeout: Duration) -> FlushOutcome {
        self.observer.wait_timeout(timeout).await
    }

    /// Stop the background loop after its final drain, waiting up to `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> FlushOutcome {
        self.shutdown.trigger();

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(worker) = worker else {
            return FlushOutcome::Drained;
        };

        match tokio::time::timeout(timeout, worker).await {
            Ok(Ok(())) => FlushOutcome::Drained,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Delivery loop ended abnormally");
                FlushOutcome::Drained
            }
            Err(_) => {
                tracing::warn!(timeout = ?timeout, "Timed out waiting for final drain");
                FlushOutcome::Cancelled
            }
        }
    }

    /// Fetch a prompt from prompt management.
    pub async fn get_prompt(&self, req: &GetPromptRequest) -> Result<Prompt> {
        Ok(self.api.get_prompt(req).await?)
    }

    /// Number of envelopes waiting to be delivered.
    pub fn pending(&self) -> usize {
        self.observer.pending()
    }

    /// The underlying observer, for non-blocking flush requests.
    pub fn observer(&self) -> &Observer<IngestionEvent, H> {
        &self.observer
    }
}

impl<H> Drop for Langfuse<H> {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
