//! In-memory stand-ins for models and HTTP collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use veritas_core::errors::{
    ClassifierError, EmbeddingError, VerificationError, VeritasResult,
};
use veritas_core::models::SearchResult;
use veritas_core::traits::{IFusionModel, IImageEncoder, ILlmClient, INewsSearch};

/// One scripted LLM reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

/// LLM that plays back a script. The last reply repeats once the script runs out.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    prompts: Mutex<Vec<String>>,
    temperatures: Mutex<Vec<f32>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedLlm {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            temperatures: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Always answer with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![Reply::Text(text.into())])
    }

    /// Always fail with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(vec![Reply::Fail(reason.into())])
    }

    /// Sleep before every reply, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn temperatures(&self) -> Vec<f32> {
        self.temperatures.lock().unwrap().clone()
    }
}

impl ILlmClient for ScriptedLlm {
    fn generate(&self, prompt: &str, temperature: f32) -> VeritasResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.temperatures.lock().unwrap().push(temperature);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let next = self.script.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = Some(reply.clone());
                reply
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Reply::Fail("empty script".into())),
        };
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(reason) => Err(VerificationError::LlmFailed { reason }.into()),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Search that returns canned results and records every query.
pub struct CannedSearch {
    results: Vec<SearchResult>,
    fail: bool,
    queries: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl CannedSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            fail: false,
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    /// `n` generic results from a trusted outlet.
    pub fn with_results(n: usize) -> Self {
        Self::new(
            (1..=n)
                .map(|i| SearchResult {
                    title: format!("Context headline {i}"),
                    snippet: format!("Snippet {i} reporting on the same events."),
                    link: format!("https://www.reuters.com/world/story-{i}"),
                    source: "Reuters".to_string(),
                })
                .collect(),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl INewsSearch for CannedSearch {
    fn search(&self, query: &str, max_results: usize) -> VeritasResult<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(VerificationError::SearchFailed {
                reason: "canned failure".into(),
            }
            .into());
        }
        Ok(self.results.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Fusion model returning a fixed score.
pub struct FixedFusionModel {
    score: f32,
    calls: AtomicUsize,
    last_inputs: Mutex<Option<(Vec<f32>, Vec<f32>)>>,
}

impl FixedFusionModel {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
            last_inputs: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(graph, image)` pair of the most recent call.
    pub fn last_inputs(&self) -> Option<(Vec<f32>, Vec<f32>)> {
        self.last_inputs.lock().unwrap().clone()
    }
}

impl IFusionModel for FixedFusionModel {
    fn predict(&self, graph: &[f32], image: &[f32]) -> VeritasResult<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_inputs.lock().unwrap() = Some((graph.to_vec(), image.to_vec()));
        Ok(self.score)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Fusion model that always fails inference.
pub struct BrokenFusionModel;

impl IFusionModel for BrokenFusionModel {
    fn predict(&self, _graph: &[f32], _image: &[f32]) -> VeritasResult<f32> {
        Err(ClassifierError::InferenceFailed {
            reason: "inference session crashed".into(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Image encoder producing a constant vector regardless of input.
pub struct ConstantImageEncoder {
    value: f32,
    dimensions: usize,
    input_side: usize,
    fail: bool,
}

impl ConstantImageEncoder {
    /// Small input side keeps preprocessing cheap in tests.
    pub fn new(value: f32, dimensions: usize) -> Self {
        Self {
            value,
            dimensions,
            input_side: 8,
            fail: false,
        }
    }

    pub fn failing(dimensions: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(0.0, dimensions)
        }
    }
}

impl IImageEncoder for ConstantImageEncoder {
    fn encode(&self, pixels: &[f32], side: usize) -> VeritasResult<Vec<f32>> {
        if self.fail {
            return Err(EmbeddingError::InferenceFailed {
                reason: "encoder offline".into(),
            }
            .into());
        }
        if pixels.len() != 3 * side * side {
            return Err(EmbeddingError::DimensionMismatch {
                expected: 3 * side * side,
                actual: pixels.len(),
            }
            .into());
        }
        Ok(vec![self.value; self.dimensions])
    }

    fn input_side(&self) -> usize {
        self.input_side
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "constant"
    }
}
