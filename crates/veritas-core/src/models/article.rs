use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::VerificationRecord;

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());
static TRUNCATION_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\[\+\d+\s+chars\]").ok());
static NUMERIC_ENTITY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|\d+);").ok());

/// A news article as delivered by the news-source collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Content-derived key: blake3 of the canonical URL.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationRecord>,
}

impl Article {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            id: Self::make_id(&url),
            title: title.into(),
            description: description.into(),
            content: String::new(),
            url,
            image: None,
            source: None,
            published_at: None,
            verification: None,
        }
    }

    /// Stable identifier for a canonical URL.
    pub fn make_id(url: &str) -> String {
        blake3::hash(url.as_bytes()).to_hex().to_string()
    }
}

/// Strip markup and feed noise from a text field.
pub fn clean_text(text: &str) -> String {
    let mut out = match TAG.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    };
    out = unescape_entities(&out);
    if let Some(re) = TRUNCATION_MARKER.as_ref() {
        out = re.replace_all(&out, "").into_owned();
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Minimal quality gate applied before articles enter verification.
pub fn is_valid_article(title: &str, description: &str) -> bool {
    title.chars().count() >= 10 && description.chars().count() >= 20
}

fn unescape_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    let numeric = match NUMERIC_ENTITY.as_ref() {
        Some(re) => re
            .replace_all(&named, |caps: &regex::Captures<'_>| {
                let body = &caps[1];
                let code = match body.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => body.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
        None => named,
    };
    // Last, so "&amp;lt;" decodes to "&lt;" and not "<".
    numeric.replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_stable_per_url() {
        let a = Article::new("https://example.com/a", "Title one here", "");
        let b = Article::new("https://example.com/a", "Different title", "");
        let c = Article::new("https://example.com/b", "Title one here", "");
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id.len(), 64);
    }

    #[test]
    fn clean_text_strips_tags_entities_and_markers() {
        let raw = "<p>Markets&nbsp;rally &amp; bonds   slip</p> [+4635 chars]";
        assert_eq!(clean_text(raw), "Markets rally & bonds slip");
    }

    #[test]
    fn clean_text_decodes_numeric_entities() {
        assert_eq!(clean_text("It&#39;s &#x41;OK"), "It's AOK");
    }

    #[test]
    fn validity_thresholds() {
        assert!(is_valid_article(
            "Ten chars!",
            "twenty characters ok"
        ));
        assert!(!is_valid_article("short", "twenty characters ok"));
        assert!(!is_valid_article("Long enough title", "too short"));
    }
}
