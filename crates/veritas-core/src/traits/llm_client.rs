use crate::errors::VeritasResult;

/// Text-generation backend.
pub trait ILlmClient: Send + Sync {
    /// Generate a completion for `prompt`. The raw text is returned unparsed.
    fn generate(&self, prompt: &str, temperature: f32) -> VeritasResult<String>;

    fn model_name(&self) -> &str;
}
