use serde::{Deserialize, Serialize};

/// Answer to a question about one article's knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub article_title: String,
}
