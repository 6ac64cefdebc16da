use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary outcome of the fusion classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Real,
    Fake,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => f.write_str("REAL"),
            Self::Fake => f.write_str("FAKE"),
        }
    }
}

/// Detection result for one article.
///
/// Invariants: `prediction == Fake` iff `fake_probability > 0.5`,
/// `real_probability == 1 - fake_probability`,
/// `confidence == max(real_probability, fake_probability)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub prediction: Prediction,
    pub confidence: f64,
    pub real_probability: f64,
    pub fake_probability: f64,
    /// Model output before thresholding (P(FAKE)).
    pub raw_score: f64,
    /// Human-readable explanation of the outcome.
    pub analysis: String,
}
