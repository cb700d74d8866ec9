//! Ingestion envelope and batch wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::model::observation::{Event, Generation, Span};
use crate::model::score::Score;
use crate::model::trace::Trace;

/// Kind of change an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngestionEventType {
    TraceCreate,
    SpanCreate,
    SpanUpdate,
    GenerationCreate,
    GenerationUpdate,
    EventCreate,
    ScoreCreate,
}

/// Domain object carried by an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IngestionBody {
    Trace(Trace),
    Span(Span),
    Generation(Generation),
    Event(Event),
    Score(Score),
}

/// Uniform wrapper around every event handed to the observer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionEvent {
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: IngestionEventType,

    /// Capture time on the client, distinct from any time inside the body.
    pub timestamp: DateTime<Utc>,

    pub body: IngestionBody,
}

impl IngestionEvent {
    /// Wrap `body` with a fresh envelope ID and the current UTC time.
    pub fn new(event_type: IngestionEventType, body: IngestionBody) -> Self {
        Self {
            id: new_id(),
            event_type,
            timestamp: Utc::now(),
            body,
        }
    }
}

/// Generate a new random identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Keep `id` if set, otherwise generate one.
pub fn ensure_id(id: &mut String) {
    if id.is_empty() {
        *id = new_id();
    }
}

/// Request body for `POST /api/public/ingestion`.
#[derive(Debug, Serialize)]
pub struct BatchIngestionRequest<'a> {
    pub batch: &'a [IngestionEvent],
}

/// Per-event acceptance returned by the ingestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionSuccess {
    pub id: String,
    pub status: u16,
}

/// Per-event rejection returned by the ingestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionFailure {
    pub id: String,
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Response of the ingestion endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestionResponse {
    #[serde(default)]
    pub successes: Vec<IngestionSuccess>,
    #[serde(default)]
    pub errors: Vec<IngestionFailure>,
}
