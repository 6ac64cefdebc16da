use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Article;

/// Terminal verification state of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conclusion {
    Real,
    Fake,
    Unverifiable,
}

impl Conclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
            Self::Unverifiable => "UNVERIFIABLE",
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conclusion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REAL" => Ok(Self::Real),
            "FAKE" => Ok(Self::Fake),
            "UNVERIFIABLE" => Ok(Self::Unverifiable),
            other => Err(format!("unknown conclusion: {other}")),
        }
    }
}

/// Cached outcome for one article id. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub conclusion: Conclusion,
    pub answer: String,
    /// True unless the article was judged FAKE.
    pub verified: bool,
    #[serde(default)]
    pub citations: Vec<String>,
}

impl VerificationRecord {
    pub fn new(conclusion: Conclusion, answer: impl Into<String>, citations: Vec<String>) -> Self {
        Self {
            conclusion,
            answer: answer.into(),
            verified: conclusion != Conclusion::Fake,
            citations,
        }
    }

    pub fn unverifiable(answer: impl Into<String>) -> Self {
        Self::new(Conclusion::Unverifiable, answer, Vec::new())
    }
}

/// Per-batch partition counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStats {
    pub real_count: usize,
    pub fake_count: usize,
    pub unverified_count: usize,
    pub total_shown: usize,
}

/// Output of one `verify_batch` call.
///
/// `articles` holds REAL then UNVERIFIABLE articles; FAKE ones are hidden and
/// only a bounded sample appears in `fake_news_detected`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationBatchResult {
    pub articles: Vec<Article>,
    pub stats: VerificationStats,
    pub fake_news_detected: Vec<Article>,
}

/// Verification cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Stored terminal records.
    pub count: usize,
    /// Keys currently being verified by some caller.
    pub in_flight: usize,
}
