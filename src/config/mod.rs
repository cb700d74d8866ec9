//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! explicit LangfuseConfig, or config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ApiConfig::resolve (explicit → LANGFUSE_* env → default host)
//!     → LangfuseConfig (immutable, handed to the client)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets are never printed by Debug

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ApiConfig, LangfuseConfig, ObservabilityConfig};
pub use validation::ValidationError;
