//! Langfuse public API client.
//!
//! # Data Flow
//! ```text
//! ApiConfig (explicit → env → default)
//!     → client.rs (reqwest client, basic auth, timeout)
//!     → POST /api/public/ingestion       (batches from the observer)
//!     → GET  /api/public/v2/prompts/{name}
//! ```
//!
//! # Security Constraints
//! - Secret key is only sent as basic-auth password
//! - Never log credentials

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{ApiError, ApiResult};
