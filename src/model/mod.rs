//! Wire and domain types for the ingestion and prompt APIs.
//!
//! Field names follow the public API (camelCase JSON); absent optionals are
//! omitted from the payload.

pub mod ingestion;
pub mod observation;
pub mod prompt;
pub mod score;
pub mod trace;

pub use ingestion::{
    BatchIngestionRequest, IngestionBody, IngestionEvent, IngestionEventType, IngestionResponse,
};
pub use observation::{Event, Generation, ObservationLevel, Span, Usage, UsageUnit};
pub use prompt::{ChatMessage, ChatPrompt, GetPromptRequest, Prompt, TextPrompt};
pub use score::Score;
pub use trace::Trace;
