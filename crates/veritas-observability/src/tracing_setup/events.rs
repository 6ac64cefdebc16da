//! Structured log events for key system operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log an issued detection verdict.
pub fn verdict_issued(prediction: &str, confidence: f64, graph_fallback: bool, image_zero: bool) {
    tracing::info!(
        event = "verdict_issued",
        prediction = %prediction,
        confidence = confidence,
        graph_fallback = graph_fallback,
        image_zero = image_zero,
        "verdict issued"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a completed verification batch.
pub fn verification_batch_completed(
    cached: usize,
    verified: usize,
    real: usize,
    fake: usize,
    unverifiable: usize,
) {
    tracing::info!(
        event = "verification_batch_completed",
        cached = cached,
        verified = verified,
        real = real,
        fake = fake,
        unverifiable = unverifiable,
        "verification batch completed"
    );
}

/// Log one failed LLM verification attempt.
pub fn verification_attempt_failed(attempt: u32, max_attempts: u32, reason: &str) {
    tracing::warn!(
        event = "verification_attempt_failed",
        attempt = attempt,
        max_attempts = max_attempts,
        reason = %reason,
        "verification attempt failed"
    );
}

/// Log a verification cache clear.
pub fn cache_cleared(removed: usize) {
    tracing::info!(event = "cache_cleared", removed = removed, "verification cache cleared");
}
