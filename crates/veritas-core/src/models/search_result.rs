use serde::{Deserialize, Serialize};

/// One grounding snippet returned by the news-search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    /// At most 200 characters.
    pub snippet: String,
    pub link: String,
    pub source: String,
}
