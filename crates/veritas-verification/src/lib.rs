//! # veritas-verification
//!
//! Grounded batch verification of news articles with a process-wide result
//! cache, trusted-source summaries with validated citations, and question
//! answering over an article's knowledge graph.
//!
//! The HTTP collaborators (`GoogleNewsSearch`, `GeminiClient`,
//! `HttpLinkProbe`) are the production implementations; everything else works
//! against the `INewsSearch` / `ILlmClient` / `LinkProbe` seams.

pub mod backoff;
pub mod batch;
pub mod cache;
pub mod chat;
pub mod citation;
pub mod http;
pub mod llm;
pub mod search;
pub mod summary;

pub use backoff::Backoff;
pub use batch::BatchVerifier;
pub use cache::VerificationCache;
pub use chat::ChatService;
pub use citation::{validate_citations, HttpLinkProbe, LinkProbe, LinkStatus};
pub use http::{HttpClient, HttpClientConfig, HttpError};
pub use llm::GeminiClient;
pub use search::GoogleNewsSearch;
pub use summary::SummaryService;
