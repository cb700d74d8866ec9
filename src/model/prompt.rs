//! Prompt management types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for fetching a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPromptRequest {
    pub prompt_name: String,
    /// Exact version; takes precedence over `label` on the server.
    pub version: Option<u32>,
    pub label: Option<String>,
}

impl GetPromptRequest {
    pub fn new(prompt_name: impl Into<String>) -> Self {
        Self {
            prompt_name: prompt_name.into(),
            ..Default::default()
        }
    }
}

/// A single chat message of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Prompt whose template is a single string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrompt {
    pub name: String,
    pub version: u32,
    pub prompt: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Prompt whose template is a list of chat messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub name: String,
    pub version: u32,
    pub prompt: Vec<ChatMessage>,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A fetched prompt, by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Text(TextPrompt),
    Chat(ChatPrompt),
}

impl Prompt {
    pub fn name(&self) -> &str {
        match self {
            Prompt::Text(p) => &p.name,
            Prompt::Chat(p) => &p.name,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Prompt::Text(p) => p.version,
            Prompt::Chat(p) => p.version,
        }
    }
}
