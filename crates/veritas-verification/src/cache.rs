//! Process-wide verification cache with per-key single-flight.
//!
//! Records are terminal: the first committed record for an id wins and is
//! never replaced until `clear()`. At most one caller verifies a given id at a
//! time; the others wait on its in-flight marker and then read the record.

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use moka::sync::Cache;
use veritas_core::models::{CacheStats, VerificationRecord};
use veritas_observability::tracing_setup::events;

/// Completion signal for one in-flight id.
#[derive(Debug, Default)]
struct InFlight {
    done: Mutex<bool>,
    cond: Condvar,
}

impl InFlight {
    fn finish(&self) {
        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        *done = true;
        self.cond.notify_all();
    }

    fn wait(&self, timeout: Duration) {
        let done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = self.cond.wait_timeout_while(done, timeout, |done| !*done);
    }
}

/// Verification records keyed by article id.
pub struct VerificationCache {
    records: Cache<String, VerificationRecord>,
    in_flight: DashMap<String, Arc<InFlight>>,
}

impl Default for VerificationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationCache {
    /// Unbounded, no expiry: records live until `clear()`.
    pub fn new() -> Self {
        Self {
            records: Cache::builder().build(),
            in_flight: DashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<VerificationRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Store `record` unless `id` already has one. Returns the stored record.
    pub fn commit(&self, id: impl Into<String>, record: VerificationRecord) -> VerificationRecord {
        self.records.entry(id.into()).or_insert(record).into_value()
    }

    /// Claim every uncached id not already in flight elsewhere.
    ///
    /// Returns the claim over the ids this caller must verify, and the ids
    /// another caller is verifying right now. Ids that already have a record,
    /// including one committed while the claim was being taken, are reported
    /// through `Claim::ready`.
    pub fn claim<'a, I>(&'a self, ids: I) -> (Claim<'a>, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut owned = Vec::new();
        let mut ready = Vec::new();
        let mut waiting = Vec::new();

        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(record) = self.records.get(id) {
                ready.push((id.to_string(), record));
                continue;
            }
            match self.in_flight.entry(id.to_string()) {
                Entry::Occupied(_) => waiting.push(id.to_string()),
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(InFlight::default()));
                    // The previous owner may have committed and released
                    // between the lookup above and the insert.
                    match self.records.get(id) {
                        Some(record) => {
                            self.release(id);
                            ready.push((id.to_string(), record));
                        }
                        None => owned.push(id.to_string()),
                    }
                }
            }
        }

        let claim = Claim {
            cache: self,
            keys: owned,
            ready,
        };
        (claim, waiting)
    }

    /// Block until the caller verifying `id` finishes or `timeout` elapses,
    /// then return whatever record is stored.
    pub fn wait_for(&self, id: &str, timeout: Duration) -> Option<VerificationRecord> {
        let flight = self.in_flight.get(id).map(|f| Arc::clone(f.value()));
        if let Some(flight) = flight {
            flight.wait(timeout);
        }
        self.records.get(id)
    }

    /// Drop every record. In-flight verifications are unaffected and commit
    /// normally when they finish.
    pub fn clear(&self) -> usize {
        let keys: Vec<Arc<String>> = self.records.iter().map(|(k, _)| k).collect();
        for key in &keys {
            self.records.invalidate(key.as_str());
        }
        events::cache_cleared(keys.len());
        keys.len()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            count: self.len(),
            in_flight: self.in_flight.len(),
        }
    }

    fn release(&self, id: &str) {
        if let Some((_, flight)) = self.in_flight.remove(id) {
            flight.finish();
        }
    }
}

/// Ownership of a set of in-flight ids. Dropping it wakes every waiter,
/// including when the owner unwinds.
pub struct Claim<'a> {
    cache: &'a VerificationCache,
    keys: Vec<String>,
    ready: Vec<(String, VerificationRecord)>,
}

impl Claim<'_> {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Records that were already stored when the claim was taken.
    pub fn ready(&self) -> &[(String, VerificationRecord)] {
        &self.ready
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        for key in self.keys.drain(..) {
            self.cache.release(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::models::Conclusion;

    fn real(answer: &str) -> VerificationRecord {
        VerificationRecord::new(Conclusion::Real, answer, Vec::new())
    }

    #[test]
    fn first_commit_wins() {
        let cache = VerificationCache::new();
        cache.commit("a", real("first"));
        let stored = cache.commit("a", VerificationRecord::unverifiable("second"));
        assert_eq!(stored.answer, "first");
        assert_eq!(cache.get("a").unwrap().conclusion, Conclusion::Real);
    }

    #[test]
    fn claim_skips_cached_and_duplicate_ids() {
        let cache = VerificationCache::new();
        cache.commit("cached", real("ok"));
        let (claim, waiting) = cache.claim(["cached", "x", "x", "y"]);
        assert_eq!(claim.keys(), ["x".to_string(), "y".to_string()]);
        assert_eq!(claim.ready().len(), 1);
        assert_eq!(claim.ready()[0].0, "cached");
        assert!(waiting.is_empty());
        assert_eq!(cache.stats().in_flight, 2);
        drop(claim);
        assert_eq!(cache.stats().in_flight, 0);
    }

    #[test]
    fn second_claimer_waits() {
        let cache = VerificationCache::new();
        let (first, _) = cache.claim(["x"]);
        let (second, waiting) = cache.claim(["x"]);
        assert_eq!(first.keys().len(), 1);
        assert!(second.is_empty());
        assert_eq!(waiting, vec!["x".to_string()]);
    }

    #[test]
    fn wait_returns_record_committed_by_owner() {
        let cache = Arc::new(VerificationCache::new());
        let (claim, _) = cache.claim(["x"]);

        let waiter = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.wait_for("x", Duration::from_secs(5)))
        };
        std::thread::sleep(Duration::from_millis(20));
        cache.commit("x", real("done"));
        drop(claim);

        let record = waiter.join().unwrap();
        assert_eq!(record.unwrap().answer, "done");
    }

    #[test]
    fn claim_after_owner_commits_returns_the_record() {
        let cache = VerificationCache::new();
        let (owner, _) = cache.claim(["x"]);
        cache.commit(
            "x",
            VerificationRecord::new(Conclusion::Fake, "fabricated", Vec::new()),
        );
        drop(owner);

        let (late, waiting) = cache.claim(["x"]);
        assert!(late.is_empty());
        assert!(waiting.is_empty());
        assert_eq!(late.ready().len(), 1);
        assert_eq!(late.ready()[0].1.conclusion, Conclusion::Fake);
        assert_eq!(cache.stats().in_flight, 0);
    }

    #[test]
    fn abandoned_claim_wakes_waiter_with_nothing() {
        let cache = VerificationCache::new();
        let (claim, _) = cache.claim(["x"]);
        drop(claim);
        assert_eq!(cache.wait_for("x", Duration::from_millis(10)), None);
    }

    #[test]
    fn clear_reports_removed_count() {
        let cache = VerificationCache::new();
        cache.commit("a", real("a"));
        cache.commit("b", real("b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
