//! Grounded batch verification over the shared cache.

pub mod parser;
pub mod prompt;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use veritas_core::config::VerificationConfig;
use veritas_core::errors::VeritasResult;
use veritas_core::models::{
    Article, Conclusion, DegradationEvent, SearchResult, VerificationBatchResult,
    VerificationRecord, VerificationStats,
};
use veritas_core::traits::{ILlmClient, INewsSearch};
use veritas_observability::tracing_setup::events;
use veritas_observability::{verification_span, DegradationTracker, TrackedDegradation};

use crate::backoff::Backoff;
use crate::cache::VerificationCache;

/// Degradation component name for fail-open batches.
pub const COMPONENT: &str = "batch_verification";

const ABANDONED_ANSWER: &str = "Verification in progress elsewhere did not complete";

/// Verifies pages of articles against trusted sources.
pub struct BatchVerifier {
    cache: Arc<VerificationCache>,
    search: Arc<dyn INewsSearch>,
    llm: Arc<dyn ILlmClient>,
    config: VerificationConfig,
    degradations: Mutex<DegradationTracker>,
}

impl BatchVerifier {
    pub fn new(
        cache: Arc<VerificationCache>,
        search: Arc<dyn INewsSearch>,
        llm: Arc<dyn ILlmClient>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            cache,
            search,
            llm,
            config,
            degradations: Mutex::new(DegradationTracker::new()),
        }
    }

    pub fn cache(&self) -> &Arc<VerificationCache> {
        &self.cache
    }

    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.tracker().events().to_vec()
    }

    /// Verify a page of articles. Never fails: unverifiable outcomes are
    /// reported as UNVERIFIABLE articles.
    ///
    /// `articles` in the result holds REAL then UNVERIFIABLE articles, each in
    /// input order; FAKE articles are hidden and sampled into
    /// `fake_news_detected`.
    pub fn verify_batch(&self, articles: Vec<Article>) -> VerificationBatchResult {
        let span = verification_span!(articles.len());
        let _guard = span.enter();

        let mut resolved: HashMap<String, VerificationRecord> = HashMap::new();
        for article in &articles {
            if let Some(record) = self.cache.get(&article.id) {
                resolved.insert(article.id.clone(), record);
            }
        }
        let cached = resolved.len();

        let (claim, waiting) = self
            .cache
            .claim(articles.iter().map(|a| a.id.as_str()).filter(|id| !resolved.contains_key(*id)));

        // Committed by another caller between the cache read and the claim.
        for (id, record) in claim.ready() {
            resolved.insert(id.clone(), record.clone());
        }

        let owned: Vec<&Article> = claim
            .keys()
            .iter()
            .filter_map(|id| articles.iter().find(|a| &a.id == id))
            .collect();
        let verified = owned.len();
        if !owned.is_empty() {
            tracing::debug!(uncached = owned.len(), model = %self.llm.model_name(), "verifying articles");
            let records = self.verify_uncached(&owned);
            for (article, record) in owned.iter().zip(records) {
                let stored = self.cache.commit(article.id.clone(), record);
                resolved.insert(article.id.clone(), stored);
            }
        }
        // Wake waiters before blocking on other callers' keys.
        drop(claim);

        let wait = Duration::from_secs(self.config.single_flight_wait_secs);
        for id in waiting {
            let record = self.cache.wait_for(&id, wait).unwrap_or_else(|| {
                tracing::warn!(id = %id, "in-flight verification abandoned");
                VerificationRecord::unverifiable(ABANDONED_ANSWER)
            });
            resolved.insert(id, record);
        }

        let result = assemble(articles, &resolved, self.config.fake_sample_limit);
        events::verification_batch_completed(
            cached,
            verified,
            result.stats.real_count,
            result.stats.fake_count,
            result.stats.unverified_count,
        );
        result
    }

    /// Run the retry loop for the claimed articles. Always returns one record
    /// per article.
    fn verify_uncached(&self, articles: &[&Article]) -> Vec<VerificationRecord> {
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        let claims = prompt::claims_prompt(&titles);
        let query = prompt::grounding_query(
            &titles,
            self.config.grounding_titles,
            self.config.title_prefix_chars,
        );

        let max_attempts = self.config.max_retries.max(1);
        let mut backoff =
            Backoff::from_millis(self.config.initial_backoff_ms, self.config.max_backoff_ms);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                backoff.wait();
            }
            match self.attempt(&claims, &query, articles.len()) {
                Ok(records) => {
                    self.tracker().mark_recovered(COMPONENT);
                    return records;
                }
                Err(e) => {
                    last_error = e.to_string();
                    events::verification_attempt_failed(attempt, max_attempts, &last_error);
                }
            }
        }

        self.tracker().record(DegradationEvent::now(
            COMPONENT,
            last_error.as_str(),
            "unverifiable",
        ));
        let answer = format!("Error: {}", prompt::truncate_chars(&last_error, 50));
        articles
            .iter()
            .map(|_| VerificationRecord::unverifiable(answer.clone()))
            .collect()
    }

    /// One attempt: fresh search, fresh LLM call, strict parse.
    fn attempt(
        &self,
        claims: &str,
        query: &str,
        expected: usize,
    ) -> VeritasResult<Vec<VerificationRecord>> {
        let results = self.grounding(query);
        let grounded = prompt::grounded(
            claims,
            &prompt::web_context(&results),
            prompt::VERIFY_INSTRUCTION,
        );
        let reply = self.llm.generate(&grounded, self.config.temperature)?;
        parser::parse_batch(&reply, expected)
    }

    /// Search failures leave the prompt without context rather than failing
    /// the attempt.
    fn grounding(&self, query: &str) -> Vec<SearchResult> {
        match self.search.search(query, self.config.search_results) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(search = %self.search.name(), error = %e, "grounding search failed");
                Vec::new()
            }
        }
    }

    fn tracker(&self) -> std::sync::MutexGuard<'_, DegradationTracker> {
        self.degradations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Attach records and partition into the display result.
fn assemble(
    articles: Vec<Article>,
    resolved: &HashMap<String, VerificationRecord>,
    fake_sample_limit: usize,
) -> VerificationBatchResult {
    let mut real = Vec::new();
    let mut fake = Vec::new();
    let mut unverifiable = Vec::new();

    for mut article in articles {
        let record = resolved
            .get(&article.id)
            .cloned()
            .unwrap_or_else(|| VerificationRecord::unverifiable(ABANDONED_ANSWER));
        let conclusion = record.conclusion;
        article.verification = Some(record);
        match conclusion {
            Conclusion::Real => real.push(article),
            Conclusion::Fake => fake.push(article),
            Conclusion::Unverifiable => unverifiable.push(article),
        }
    }

    let stats = VerificationStats {
        real_count: real.len(),
        fake_count: fake.len(),
        unverified_count: unverifiable.len(),
        total_shown: real.len() + unverifiable.len(),
    };
    fake.truncate(fake_sample_limit);
    real.extend(unverifiable);

    VerificationBatchResult {
        articles: real,
        stats,
        fake_news_detected: fake,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str) -> Article {
        let mut a = Article::new(format!("https://x.example/{id}"), "A headline long enough", "");
        a.id = id.to_string();
        a
    }

    fn record(conclusion: Conclusion) -> VerificationRecord {
        VerificationRecord::new(conclusion, "why", Vec::new())
    }

    #[test]
    fn assemble_orders_real_before_unverifiable() {
        let articles = vec![article("u"), article("f"), article("r")];
        let resolved = HashMap::from([
            ("u".to_string(), record(Conclusion::Unverifiable)),
            ("f".to_string(), record(Conclusion::Fake)),
            ("r".to_string(), record(Conclusion::Real)),
        ]);
        let result = assemble(articles, &resolved, 3);
        let ids: Vec<&str> = result.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["r", "u"]);
        assert_eq!(result.fake_news_detected[0].id, "f");
        assert_eq!(result.stats.total_shown, 2);
    }

    #[test]
    fn fake_sample_is_bounded_but_counted() {
        let articles: Vec<Article> = (0..5).map(|i| article(&format!("f{i}"))).collect();
        let resolved: HashMap<String, VerificationRecord> = (0..5)
            .map(|i| (format!("f{i}"), record(Conclusion::Fake)))
            .collect();
        let result = assemble(articles, &resolved, 3);
        assert_eq!(result.stats.fake_count, 5);
        assert_eq!(result.fake_news_detected.len(), 3);
        assert!(result.articles.is_empty());
    }
}
