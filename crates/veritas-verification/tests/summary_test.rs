//! Trusted-source summaries against scripted collaborators. No network.

use std::sync::Arc;

use test_fixtures::load_text;
use test_fixtures::mocks::{CannedSearch, ScriptedLlm};
use veritas_core::config::SummaryConfig;
use veritas_core::errors::VerificationError;
use veritas_core::models::SummaryRequest;
use veritas_core::VeritasError;
use veritas_verification::summary::{FAILED_SUMMARY, MISSING_SUMMARY, UNPARSEABLE_SUMMARY};
use veritas_verification::{LinkStatus, SummaryService};

fn service(llm: Arc<ScriptedLlm>, search: Arc<CannedSearch>) -> SummaryService {
    let probe = Arc::new(|_: &str| LinkStatus::Status(200));
    SummaryService::new(search, llm, probe, SummaryConfig::default())
}

fn request(topic: &str) -> SummaryRequest {
    SummaryRequest {
        topic: topic.to_string(),
        description: "Policymakers kept the benchmark rate unchanged.".into(),
        content: String::new(),
    }
}

#[test]
fn summary_with_validated_citations() {
    let llm = Arc::new(ScriptedLlm::always(load_text("llm/summary_reply.json")));
    let search = Arc::new(CannedSearch::with_results(8));
    let svc = service(llm.clone(), search.clone());

    let summary = svc
        .summarize(&request("Central bank holds interest rates steady"))
        .unwrap();

    assert!(summary.summary.starts_with("The central bank left"));
    assert_eq!(summary.citations.len(), 2, "the malformed url is dropped");
    assert_eq!(summary.citations[0].source_name, "Reuters");
    assert!(summary.error.is_none());

    assert_eq!(search.queries(), vec!["Central bank holds interest rates steady"]);
    assert_eq!(llm.temperatures(), vec![0.2]);
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("Description: Policymakers kept the benchmark rate unchanged."));
    assert!(prompt.contains("- Context headline 5 (Reuters)"));
    assert!(!prompt.contains("Context headline 6"), "summary grounding uses five results");
}

#[test]
fn missing_topic_is_a_request_error() {
    let svc = service(
        Arc::new(ScriptedLlm::always("{}")),
        Arc::new(CannedSearch::empty()),
    );
    match svc.summarize(&request("   ")).unwrap_err() {
        VeritasError::VerificationError(VerificationError::MissingField { field }) => {
            assert_eq!(field, "topic")
        }
        other => panic!("expected MissingField, got {other}"),
    }
}

#[test]
fn llm_failure_becomes_placeholder_with_error() {
    let reason = "x".repeat(400);
    let svc = service(
        Arc::new(ScriptedLlm::failing(reason)),
        Arc::new(CannedSearch::empty()),
    );

    let summary = svc.summarize(&request("Rates")).unwrap();

    assert_eq!(summary.summary, FAILED_SUMMARY);
    assert!(summary.citations.is_empty());
    let error = summary.error.unwrap();
    assert_eq!(error.chars().count(), 200);
}

#[test]
fn long_prose_reply_is_used_verbatim() {
    let prose = "The central bank held rates steady on Thursday, according to several outlets.";
    let svc = service(
        Arc::new(ScriptedLlm::always(prose)),
        Arc::new(CannedSearch::empty()),
    );
    let summary = svc.summarize(&request("Rates")).unwrap();
    assert_eq!(summary.summary, prose);
    assert!(summary.error.is_none());
}

#[test]
fn very_long_prose_is_truncated_with_ellipsis() {
    let svc = service(
        Arc::new(ScriptedLlm::always("word ".repeat(400))),
        Arc::new(CannedSearch::empty()),
    );
    let summary = svc.summarize(&request("Rates")).unwrap();
    assert_eq!(summary.summary.chars().count(), 1000);
    assert!(summary.summary.ends_with("..."));
}

#[test]
fn short_prose_reply_gives_placeholder() {
    let svc = service(
        Arc::new(ScriptedLlm::always("no idea")),
        Arc::new(CannedSearch::empty()),
    );
    let summary = svc.summarize(&request("Rates")).unwrap();
    assert_eq!(summary.summary, UNPARSEABLE_SUMMARY);
}

#[test]
fn too_short_summary_field_is_replaced() {
    let svc = service(
        Arc::new(ScriptedLlm::always(
            r#"```json
{"topic":"Rates","summary":"Held.","citations":[]}
```"#,
        )),
        Arc::new(CannedSearch::empty()),
    );
    let summary = svc.summarize(&request("Rates")).unwrap();
    assert_eq!(summary.summary, MISSING_SUMMARY);
    assert_eq!(summary.topic, "Rates");
}

#[test]
fn topic_and_summary_are_capped() {
    let reply = serde_json::json!({
        "topic": "t".repeat(500),
        "summary": "s".repeat(3000),
        "citations": "not a list",
    })
    .to_string();
    let svc = service(Arc::new(ScriptedLlm::always(reply)), Arc::new(CannedSearch::empty()));

    let summary = svc.summarize(&request("Rates")).unwrap();

    assert_eq!(summary.topic.chars().count(), 200);
    assert_eq!(summary.summary.chars().count(), 1000);
    assert!(summary.citations.is_empty());
}

#[test]
fn unreachable_citations_are_dropped() {
    let llm = Arc::new(ScriptedLlm::always(load_text("llm/summary_reply.json")));
    let probe = Arc::new(|url: &str| {
        if url.contains("bbc") {
            LinkStatus::Status(404)
        } else {
            LinkStatus::TimedOut
        }
    });
    let svc = SummaryService::new(
        Arc::new(CannedSearch::empty()),
        llm,
        probe,
        SummaryConfig::default(),
    );

    let summary = svc.summarize(&request("Rates")).unwrap();

    let sources: Vec<&str> = summary.citations.iter().map(|c| c.source_name.as_str()).collect();
    assert_eq!(sources, vec!["Reuters"]);
}
