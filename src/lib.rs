//! Langfuse client SDK.
//!
//! Records traces, spans, generations, events and scores without blocking the
//! caller. Envelopes are queued in memory and shipped in batches to the
//! ingestion API by a background loop that fires on a fixed interval, on
//! demand, and once more at shutdown.
//!
//! ```no_run
//! use std::time::Duration;
//! use langfuse::{Langfuse, LangfuseConfig};
//! use langfuse::model::{Span, Trace};
//!
//! # async fn run() -> langfuse::Result<()> {
//! let langfuse = Langfuse::new(LangfuseConfig::default())?;
//! let trace = langfuse.trace(Trace::named("checkout"));
//! let span = langfuse.span(Span { trace_id: trace.id.clone(), ..Default::default() }, None);
//! langfuse.span_end(span)?;
//! langfuse.flush_timeout(Duration::from_secs(5)).await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod langfuse;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod observer;

pub use config::LangfuseConfig;
pub use error::{LangfuseError, Result};
pub use langfuse::Langfuse;
pub use lifecycle::Shutdown;
pub use observer::{FlushOutcome, Observer};
