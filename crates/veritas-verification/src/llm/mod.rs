//! LLM collaborators.

mod gemini;

pub use gemini::GeminiClient;
