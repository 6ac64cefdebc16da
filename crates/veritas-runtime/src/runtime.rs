//! VeritasRuntime: owns the detection pipeline, the verification cache, the
//! batch verifier, the summary service and the knowledge-graph chat.
//!
//! A missing or corrupt model does not stop the runtime from starting:
//! detection then answers `ModelNotLoaded` while verification and summaries
//! keep working.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use veritas_core::config::VeritasConfig;
use veritas_core::errors::{DetectionError, VeritasResult};
use veritas_core::models::{
    Article, CacheStats, ChatAnswer, Entity, KnowledgeGraph, ModelStatus, NewsSummary, Relation,
    SummaryRequest, VerificationBatchResult, Verdict,
};
use veritas_core::traits::{ILlmClient, INewsSearch};
use veritas_detection::{status, DetectionService, FusionClassifier, OnnxFusionModel};
use veritas_embeddings::{ClipImageEncoder, GraphEmbedder, ImageEmbedder};
use veritas_observability::{init_tracing, TrackedDegradation};
use veritas_verification::{
    BatchVerifier, ChatService, GeminiClient, GoogleNewsSearch, HttpLinkProbe, LinkProbe, SummaryService,
    VerificationCache,
};

/// Options for constructing the runtime from configuration.
#[derive(Debug, Default)]
pub struct RuntimeOptions {
    /// TOML configuration file. Ignored when `config_toml` is set.
    pub config_path: Option<PathBuf>,
    /// Inline TOML configuration. If neither is set, defaults are used.
    pub config_toml: Option<String>,
    /// Install the global tracing subscriber from the observability section.
    pub init_tracing: bool,
}

/// Pre-built components, for hosts that bring their own models or
/// collaborators.
pub struct RuntimeParts {
    pub config: VeritasConfig,
    /// `Err` holds the reason detection is unavailable.
    pub detection: Result<DetectionService, String>,
    pub search: Arc<dyn INewsSearch>,
    pub llm: Arc<dyn ILlmClient>,
    pub probe: Arc<dyn LinkProbe>,
}

/// The core boundary consumed by request handlers.
pub struct VeritasRuntime {
    config: VeritasConfig,
    detection: Result<DetectionService, String>,
    cache: Arc<VerificationCache>,
    verifier: BatchVerifier,
    summaries: SummaryService,
    chats: ChatService,
}

impl VeritasRuntime {
    /// Resolve configuration, load the models and build the HTTP
    /// collaborators.
    ///
    /// # Errors
    /// Configuration errors only. Model load failures are reported through
    /// `model_status()` instead.
    pub fn new(opts: RuntimeOptions) -> VeritasResult<Self> {
        let mut config = match (&opts.config_toml, &opts.config_path) {
            (Some(toml_str), _) => VeritasConfig::from_toml(toml_str)?,
            (None, Some(path)) => VeritasConfig::from_file(path)?,
            (None, None) => VeritasConfig::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        if opts.init_tracing {
            init_tracing(&config.observability);
        }

        let detection = load_detection(&config).map_err(|e| {
            tracing::warn!(error = %e, "detection models not loaded; detection disabled");
            e.to_string()
        });

        let verification = &config.verification;
        let search: Arc<dyn INewsSearch> = Arc::new(GoogleNewsSearch::new(verification.search.clone()));
        let gemini = GeminiClient::new(&verification.llm);
        if !gemini.is_configured() {
            tracing::warn!("GEMINI_API_KEY not set; verification will fail open");
        }
        let llm: Arc<dyn ILlmClient> = Arc::new(gemini);
        let probe: Arc<dyn LinkProbe> = Arc::new(HttpLinkProbe::new(Duration::from_secs(
            verification.summary.citation_timeout_secs,
        )));

        Ok(Self::from_parts(RuntimeParts {
            config,
            detection,
            search,
            llm,
            probe,
        }))
    }

    pub fn from_parts(parts: RuntimeParts) -> Self {
        let RuntimeParts {
            config,
            detection,
            search,
            llm,
            probe,
        } = parts;

        let cache = Arc::new(VerificationCache::new());
        let verifier = BatchVerifier::new(
            Arc::clone(&cache),
            Arc::clone(&search),
            Arc::clone(&llm),
            config.verification.clone(),
        );
        let chats = ChatService::new(Arc::clone(&llm), config.verification.chat.clone());
        let summaries = SummaryService::new(search, llm, probe, config.verification.summary.clone());

        if let Ok(service) = &detection {
            tracing::info!(
                classifier = %service.classifier().model_name(),
                image_encoder = %service.image_embedder().encoder_name(),
                dimensions = service.classifier().dimensions(),
                "detection pipeline ready"
            );
        }

        Self {
            config,
            detection,
            cache,
            verifier,
            summaries,
            chats,
        }
    }

    pub fn config(&self) -> &VeritasConfig {
        &self.config
    }

    /// Classify one article from its image and knowledge graph.
    ///
    /// # Errors
    /// `DetectionError::ModelNotLoaded` when startup could not load a model,
    /// otherwise whatever `DetectionService::predict` reports.
    pub fn detect(
        &self,
        image_url: &str,
        entities: &[Entity],
        relations: &[Relation],
    ) -> VeritasResult<Verdict> {
        match &self.detection {
            Ok(service) => service.predict(image_url, entities, relations),
            Err(reason) => Err(DetectionError::ModelNotLoaded {
                reason: reason.clone(),
            }
            .into()),
        }
    }

    pub fn verify_batch(&self, articles: Vec<Article>) -> VerificationBatchResult {
        self.verifier.verify_batch(articles)
    }

    /// Drop every cached verification. Returns how many were removed.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn model_status(&self) -> ModelStatus {
        match &self.detection {
            Ok(service) => status::ready(service),
            Err(reason) => status::not_loaded(reason.as_str(), self.config.embedding.dimensions),
        }
    }

    pub fn summarize(&self, request: &SummaryRequest) -> VeritasResult<NewsSummary> {
        self.summaries.summarize(request)
    }

    /// Answer a question about one article from its knowledge graph.
    pub fn chat(
        &self,
        kg: &KnowledgeGraph,
        article_title: &str,
        question: &str,
    ) -> VeritasResult<ChatAnswer> {
        self.chats.ask(kg, article_title, question)
    }

    /// Every recorded degradation, oldest first.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        let mut all = self.verifier.degradations();
        if let Ok(service) = &self.detection {
            all.extend(service.degradations());
        }
        all.sort_by_key(|t| t.event.timestamp);
        all
    }
}

/// Load both ONNX models and assemble the detection pipeline.
fn load_detection(config: &VeritasConfig) -> VeritasResult<DetectionService> {
    let dimensions = config.embedding.dimensions;
    let image = &config.embedding.image;

    let encoder = ClipImageEncoder::load(
        &image.model_path,
        image.input_side,
        dimensions,
        image.intra_threads,
    )?;
    let fusion = OnnxFusionModel::load(&config.detection.model_path, config.detection.intra_threads)?;

    Ok(DetectionService::new(
        GraphEmbedder::new(config.embedding.graph.clone(), dimensions),
        ImageEmbedder::new(Arc::new(encoder), image.clone(), dimensions),
        FusionClassifier::new(Arc::new(fusion), dimensions),
    ))
}
