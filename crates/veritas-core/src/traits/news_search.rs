use crate::errors::VeritasResult;
use crate::models::SearchResult;

/// Web news search used for grounding.
pub trait INewsSearch: Send + Sync {
    /// At most `max_results` results. An empty list is a valid answer.
    fn search(&self, query: &str, max_results: usize) -> VeritasResult<Vec<SearchResult>>;

    fn name(&self) -> &str;
}
