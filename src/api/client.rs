//! HTTP client for the Langfuse public API.
//!
//! # Responsibilities
//! - Post ingestion batches with basic auth
//! - Fetch prompts by name, version or label
//! - Map non-2xx responses and transport failures to `ApiError`
//!
//! # Design Decisions
//! - One attempt per call; callers own any retry policy
//! - Request timeout comes from `ApiConfig::timeout_secs`
//! - Credentials are never logged

use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::api::types::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::model::{
    BatchIngestionRequest, GetPromptRequest, IngestionEvent, IngestionResponse, Prompt,
};
use crate::observer::{Deliver, DeliveryError};

const INGESTION_PATH: &str = "/api/public/ingestion";
const PROMPTS_PATH: &str = "/api/public/v2/prompts";

/// Langfuse API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    host: String,
    public_key: String,
    secret_key: String,
}

impl ApiClient {
    /// Create a client, resolving unset fields from the environment.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let config = config.resolve();

        Url::parse(&config.host)
            .map_err(|e| ApiError::InvalidUrl(format!("'{}': {}", config.host, e)))?;

        if !config.has_credentials() {
            tracing::warn!(
                host = %config.host,
                "Langfuse credentials are not set; the API will reject requests"
            );
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            host: config.host.trim_end_matches('/').to_string(),
            public_key: config.public_key,
            secret_key: config.secret_key,
        })
    }

    /// Base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        let raw = format!("{}{}", self.host, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("'{}': {}", raw, e)))
    }

    /// Send one batch of envelopes to the ingestion endpoint.
    pub async fn ingestion(&self, batch: &[IngestionEvent]) -> ApiResult<IngestionResponse> {
        let resp = self
            .http
            .post(self.endpoint(INGESTION_PATH)?)
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .json(&BatchIngestionRequest { batch })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status.as_u16() >= 300 {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(IngestionResponse::default());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch a prompt by name, optionally pinned to a version or label.
    pub async fn get_prompt(&self, req: &GetPromptRequest) -> ApiResult<Prompt> {
        let mut url = self.endpoint(PROMPTS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.host.clone()))?
            .push(&req.prompt_name);
        if req.version.is_some() || req.label.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(version) = req.version {
                query.append_pair("version", &version.to_string());
            }
            if let Some(label) = &req.label {
                query.append_pair("label", label);
            }
        }

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            // Prefer the API's own error message when it sends one.
            let body = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_prompt(serde_json::from_str(&text)?)
    }
}

fn parse_prompt(value: Value) -> ApiResult<Prompt> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match kind.as_str() {
        "text" => Ok(Prompt::Text(serde_json::from_value(value)?)),
        "chat" => Ok(Prompt::Chat(serde_json::from_value(value)?)),
        _ => Err(ApiError::UnknownPromptType(kind)),
    }
}

impl Deliver<IngestionEvent> for ApiClient {
    fn deliver(
        &self,
        batch: Vec<IngestionEvent>,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        async move {
            let response = self.ingestion(&batch).await?;

            for failure in &response.errors {
                tracing::warn!(
                    event_id = %failure.id,
                    status = failure.status,
                    message = failure.message.as_deref().unwrap_or(""),
                    "Event rejected by ingestion API"
                );
            }
            tracing::debug!(
                accepted = response.successes.len(),
                rejected = response.errors.len(),
                "Ingestion batch sent"
            );
            Ok(())
        }
    }
}
