//! Runtime wiring with mock components, plus startup without model files.

use std::sync::Arc;

use test_fixtures::mocks::{CannedSearch, ConstantImageEncoder, FixedFusionModel, ScriptedLlm};
use test_fixtures::{articles, batch_reply, small_graph};
use veritas_core::config::VeritasConfig;
use veritas_core::errors::{DetectionError, VerificationError};
use veritas_core::models::{ModelState, Prediction, SummaryRequest};
use veritas_core::VeritasError;
use veritas_detection::{DetectionService, FusionClassifier};
use veritas_embeddings::{GraphEmbedder, ImageEmbedder};
use veritas_runtime::{RuntimeOptions, RuntimeParts, VeritasRuntime};
use veritas_verification::LinkStatus;

const DEAD_IMAGE: &str = "http://127.0.0.1:9/photo.jpg";

fn test_config() -> VeritasConfig {
    let mut config = VeritasConfig::default();
    config.embedding.graph.walks_per_node = 5;
    config.embedding.graph.epochs = 1;
    config.embedding.graph.seed = Some(3);
    config.embedding.image.fetch_timeout_secs = 2;
    config.verification.initial_backoff_ms = 0;
    config.verification.max_backoff_ms = 0;
    config
}

fn detection(config: &VeritasConfig, score: f32) -> DetectionService {
    let d = config.embedding.dimensions;
    DetectionService::new(
        GraphEmbedder::new(config.embedding.graph.clone(), d),
        ImageEmbedder::new(
            Arc::new(ConstantImageEncoder::new(1.0, d)),
            config.embedding.image.clone(),
            d,
        ),
        FusionClassifier::new(Arc::new(FixedFusionModel::new(score)), d),
    )
}

fn runtime(detection: Result<DetectionService, String>, llm: Arc<ScriptedLlm>) -> VeritasRuntime {
    VeritasRuntime::from_parts(RuntimeParts {
        config: test_config(),
        detection,
        search: Arc::new(CannedSearch::with_results(3)),
        llm,
        probe: Arc::new(|_: &str| LinkStatus::Status(200)),
    })
}

#[test]
fn detect_with_loaded_models() {
    let rt = runtime(
        Ok(detection(&test_config(), 0.8)),
        Arc::new(ScriptedLlm::always("{}")),
    );
    let kg = small_graph();

    let verdict = rt.detect(DEAD_IMAGE, &kg.entities, &kg.relations).unwrap();
    assert_eq!(verdict.prediction, Prediction::Fake);

    let status = rt.model_status();
    assert_eq!(status.status, ModelState::Ready);
    assert!(status.model_loaded);
    assert_eq!(status.classifier.as_deref(), Some("fixed"));
    assert_eq!(status.image_encoder.as_deref(), Some("constant"));
    assert_eq!(status.embedding_dim, 512);

    // The dead image URL degrades to the zero vector.
    let components: Vec<String> = rt
        .degradations()
        .into_iter()
        .map(|t| t.event.component)
        .collect();
    assert!(components.contains(&"image_embedding".to_string()));
}

#[test]
fn detect_without_models_is_unavailable() {
    let rt = runtime(
        Err("model file not found".into()),
        Arc::new(ScriptedLlm::always("{}")),
    );
    let kg = small_graph();

    match rt.detect(DEAD_IMAGE, &kg.entities, &kg.relations).unwrap_err() {
        VeritasError::DetectionError(DetectionError::ModelNotLoaded { reason }) => {
            assert!(reason.contains("not found"))
        }
        other => panic!("expected ModelNotLoaded, got {other}"),
    }

    let status = rt.model_status();
    assert_eq!(status.status, ModelState::NotLoaded);
    assert!(!status.model_loaded);
    assert_eq!(status.error.as_deref(), Some("model file not found"));
}

#[test]
fn verification_works_without_models() {
    let llm = Arc::new(ScriptedLlm::always(batch_reply(&["REAL", "FAKE"])));
    let rt = runtime(Err("no models".into()), llm.clone());

    let result = rt.verify_batch(articles(2));
    assert_eq!(result.stats.real_count, 1);
    assert_eq!(result.stats.fake_count, 1);
    assert_eq!(rt.cache_stats().count, 2);

    rt.verify_batch(articles(2));
    assert_eq!(llm.calls(), 1);

    assert_eq!(rt.clear_cache(), 2);
    assert_eq!(rt.cache_stats().count, 0);
}

#[test]
fn summarize_through_runtime() {
    let reply = r#"{"topic":"Rates","summary":"The bank held its benchmark rate steady.","citations":[{"source_name":"Reuters","title":"Hold","url":"https://www.reuters.com/x"}]}"#;
    let rt = runtime(Err("no models".into()), Arc::new(ScriptedLlm::always(reply)));

    let summary = rt
        .summarize(&SummaryRequest {
            topic: "Rates".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(summary.citations.len(), 1);
    assert!(summary.error.is_none());
}

#[test]
fn chat_through_runtime_without_models() {
    let llm = Arc::new(ScriptedLlm::always("Acme Corp is based in Springfield."));
    let rt = runtime(Err("no models".into()), llm.clone());
    let kg = small_graph();

    let answer = rt.chat(&kg, "Acme expands", "Where is Acme based?").unwrap();
    assert_eq!(answer.answer, "Acme Corp is based in Springfield.");
    assert_eq!(answer.article_title, "Acme expands");

    match rt.chat(&kg, "Acme expands", "").unwrap_err() {
        VeritasError::VerificationError(VerificationError::MissingField { field }) => {
            assert_eq!(field, "question")
        }
        other => panic!("expected MissingField, got {other}"),
    }
    assert_eq!(llm.calls(), 1);
}

#[test]
fn startup_without_model_files_still_serves() {
    let rt = VeritasRuntime::new(RuntimeOptions {
        config_toml: Some(
            r#"
[detection]
model_path = "/nonexistent/veritas/fusion.onnx"

[embedding.image]
model_path = "/nonexistent/veritas/clip.onnx"
"#
            .into(),
        ),
        ..Default::default()
    })
    .unwrap();

    let status = rt.model_status();
    assert_eq!(status.status, ModelState::NotLoaded);
    assert!(status.error.unwrap().contains("model file not found"));
    assert_eq!(rt.cache_stats().count, 0);
}

#[test]
fn invalid_config_fails_startup() {
    let err = VeritasRuntime::new(RuntimeOptions {
        config_toml: Some("[verification]\nmax_retries = 0\n".into()),
        ..Default::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, VeritasError::ConfigError(_)));
}
