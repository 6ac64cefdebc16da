/// Verification and summary pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("news search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("LLM request failed: {reason}")]
    LlmFailed { reason: String },

    #[error("malformed LLM response: {reason}")]
    MalformedResponse { reason: String },

    #[error("LLM returned no results")]
    EmptyResults,

    #[error("missing required field: {field}")]
    MissingField { field: String },
}
