//! Threshold and explain a fused score.

use veritas_core::constants::FAKE_THRESHOLD;
use veritas_core::models::{Prediction, Verdict};

/// Build the verdict for `fake_probability`.
///
/// FAKE iff the probability is strictly above 0.5; confidence is the larger
/// of the two class probabilities.
pub fn derive_verdict(fake_probability: f64) -> Verdict {
    let fake = fake_probability.clamp(0.0, 1.0);
    let real = 1.0 - fake;
    let prediction = if fake > FAKE_THRESHOLD {
        Prediction::Fake
    } else {
        Prediction::Real
    };
    let confidence = fake.max(real);

    Verdict {
        prediction,
        confidence,
        real_probability: real,
        fake_probability: fake,
        raw_score: fake_probability,
        analysis: analysis_text(prediction, confidence),
    }
}

fn analysis_text(prediction: Prediction, confidence: f64) -> String {
    let percent = confidence * 100.0;
    match prediction {
        Prediction::Real => format!(
            "The neural model indicates {percent:.1}% confidence in this article's authenticity. \
             This result is derived from matching the image features with the extracted \
             knowledge graph entities and their verified relationships."
        ),
        Prediction::Fake => format!(
            "Caution: The model has flagged this content as potentially manipulated with \
             {percent:.1}% confidence. Relational inconsistencies were detected between the \
             visual context and the reported entities."
        ),
    }
}
