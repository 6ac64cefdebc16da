mod article;
mod chat;
mod degradation_event;
mod embedding;
mod graph;
mod model_status;
mod search_result;
mod summary;
mod verdict;
mod verification;

pub use article::{clean_text, is_valid_article, Article};
pub use chat::ChatAnswer;
pub use degradation_event::DegradationEvent;
pub use embedding::{GraphEmbedding, GraphEmbeddingSource, ImageEmbedding, ImageEmbeddingSource};
pub use graph::{Entity, EntityType, KnowledgeGraph, Relation};
pub use model_status::{ModelState, ModelStatus};
pub use search_result::SearchResult;
pub use summary::{Citation, NewsSummary, SummaryRequest};
pub use verdict::{Prediction, Verdict};
pub use verification::{
    CacheStats, Conclusion, VerificationBatchResult, VerificationRecord, VerificationStats,
};
