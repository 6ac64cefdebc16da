use serde::{Deserialize, Serialize};

/// Input to the trusted-source summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub topic: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
}

/// A source link that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_name: String,
    pub title: String,
    pub url: String,
}

/// Summary payload. Failures still produce one, with `error` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub topic: String,
    pub summary: String,
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
