use std::sync::Arc;

use dashmap::DashMap;
use time::{Duration, OffsetDateTime};

const MAX_TRACKED_KEYS: usize = 10_000;

/// Where cooldown timestamps live. In-process by default; the seam exists so
/// a shared cache can replace it without touching the handlers.
pub trait CooldownStore: Send + Sync {
    fn get(&self, key: &str) -> Option<OffsetDateTime>;
    fn set(&self, key: &str, at: OffsetDateTime);
    fn len(&self) -> usize;
    fn prune_older_than(&self, cutoff: OffsetDateTime);
}

#[derive(Default)]
pub struct InMemoryCooldownStore {
    entries: DashMap<String, OffsetDateTime>,
}

impl CooldownStore for InMemoryCooldownStore {
    fn get(&self, key: &str) -> Option<OffsetDateTime> {
        self.entries.get(key).map(|entry| *entry.value())
    }

    fn set(&self, key: &str, at: OffsetDateTime) {
        self.entries.insert(key.to_string(), at);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn prune_older_than(&self, cutoff: OffsetDateTime) {
        self.entries.retain(|_, at| *at >= cutoff);
    }
}

/// One resend-verification attempt per key per window. Advisory: state is
/// in-process and resets on restart.
pub struct ResendLimiter {
    store: Arc<dyn CooldownStore>,
    window: Duration,
}

impl ResendLimiter {
    pub fn new(store: Arc<dyn CooldownStore>, window: Duration) -> Self {
        Self { store, window }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryCooldownStore::default()),
            Duration::seconds(60),
        )
    }

    /// Ok records the attempt; Err carries whole seconds until the key frees
    /// up, rounded up so the caller never waits too little.
    pub fn try_acquire(&self, key: &str) -> Result<(), u64> {
        let now = OffsetDateTime::now_utc();
        if let Some(last) = self.store.get(key) {
            let elapsed = now - last;
            if elapsed < self.window {
                let remaining = self.window - elapsed;
                let mut seconds = remaining.whole_seconds();
                if remaining.subsec_nanoseconds() > 0 {
                    seconds += 1;
                }
                return Err(seconds.max(1) as u64);
            }
        }
        if self.store.len() >= MAX_TRACKED_KEYS {
            self.store.prune_older_than(now - self.window);
        }
        self.store.set(key, now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter_with_store() -> (ResendLimiter, Arc<InMemoryCooldownStore>) {
        let store = Arc::new(InMemoryCooldownStore::default());
        let limiter = ResendLimiter::new(store.clone(), Duration::seconds(60));
        (limiter, store)
    }

    #[test]
    fn first_attempt_passes_second_is_limited() {
        let (limiter, _) = limiter_with_store();
        assert!(limiter.try_acquire("a@vitstudent.ac.in").is_ok());
        let remaining = limiter.try_acquire("a@vitstudent.ac.in").unwrap_err();
        assert!((1..=60).contains(&remaining));
    }

    #[test]
    fn keys_do_not_interfere() {
        let (limiter, _) = limiter_with_store();
        assert!(limiter.try_acquire("first@artvip.ac.in").is_ok());
        assert!(limiter.try_acquire("second@artvip.ac.in").is_ok());
    }

    #[test]
    fn expired_cooldown_frees_the_key() {
        let (limiter, store) = limiter_with_store();
        store.set("stale@artvip.ac.in", OffsetDateTime::now_utc() - Duration::seconds(61));
        assert!(limiter.try_acquire("stale@artvip.ac.in").is_ok());
    }

    #[test]
    fn remaining_seconds_shrink_with_age() {
        let (limiter, store) = limiter_with_store();
        store.set("old@artvip.ac.in", OffsetDateTime::now_utc() - Duration::seconds(45));
        let remaining = limiter.try_acquire("old@artvip.ac.in").unwrap_err();
        assert!(remaining <= 16, "45s elapsed of 60s leaves at most ~15s, got {remaining}");
        assert!(remaining >= 1);
    }

    #[test]
    fn prune_drops_only_stale_entries() {
        let store = InMemoryCooldownStore::default();
        let now = OffsetDateTime::now_utc();
        store.set("stale", now - Duration::seconds(120));
        store.set("fresh", now);
        store.prune_older_than(now - Duration::seconds(60));
        assert_eq!(store.get("stale"), None);
        assert!(store.get("fresh").is_some());
        assert_eq!(store.len(), 1);
    }
}
