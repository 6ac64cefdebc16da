//! Test fixture loader and mock collaborators for Veritas integration tests.
//!
//! Provides typed deserialization of the fixture files under `fixtures/` and
//! in-memory stand-ins for the ONNX models and HTTP collaborators.

pub mod mocks;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

use veritas_core::models::{Article, Entity, KnowledgeGraph, Relation};

/// Root directory of the fixture files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_text(relative_path);
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!(
            "Failed to parse fixture {}: {}",
            fixture_path(relative_path).display(),
            e
        )
    })
}

/// Load a fixture file verbatim.
pub fn load_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixture_path(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Load a knowledge graph from `fixtures/graphs/<name>.json`.
pub fn load_graph(name: &str) -> KnowledgeGraph {
    load_fixture(&format!("graphs/{name}.json"))
}

/// Load an article page from `fixtures/articles/<name>.json`.
pub fn load_articles(name: &str) -> Vec<Article> {
    load_fixture(&format!("articles/{name}.json"))
}

/// `n` distinct articles with predictable titles and URLs.
pub fn articles(n: usize) -> Vec<Article> {
    (1..=n)
        .map(|i| {
            Article::new(
                format!("https://news.example.com/story-{i}"),
                format!("Headline number {i} about regional elections"),
                format!("Description {i} long enough to pass the quality gate."),
            )
        })
        .collect()
}

/// Two linked entities plus one implicit node.
pub fn small_graph() -> KnowledgeGraph {
    KnowledgeGraph::new(
        vec![
            Entity::new("Jane Doe", "PERSON"),
            Entity::new("Acme Corp", "ORGANIZATION"),
        ],
        vec![
            Relation::new("Jane Doe", "Acme Corp", "works_for"),
            Relation::new("Acme Corp", "Springfield", "based_in"),
        ],
    )
}

/// A solid-color PNG encoded in memory.
pub fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("Failed to encode PNG fixture: {e}"));
    out.into_inner()
}

/// Render an LLM batch reply for the given conclusions, one result per entry.
pub fn batch_reply(conclusions: &[&str]) -> String {
    let results: Vec<serde_json::Value> = conclusions
        .iter()
        .enumerate()
        .map(|(i, c)| {
            serde_json::json!({
                "article_index": i + 1,
                "conclusion": c,
                "answer": format!("Assessment for article {}", i + 1),
                "citations": [format!("https://source.example.com/{}", i + 1)],
            })
        })
        .collect();
    serde_json::json!({ "results": results }).to_string()
}
