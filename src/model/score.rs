//! Score body.

use serde::{Deserialize, Serialize};

/// An evaluation attached to a trace or one of its observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Required; scores are never attached to an auto-created trace.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trace_id: String,

    pub name: String,

    pub value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
