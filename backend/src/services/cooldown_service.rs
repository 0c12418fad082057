use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Per-player spin cooldowns kept in memory. Each entry stores when the
/// player may spin again.
pub struct CooldownStore {
    window: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl CooldownStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // A panic elsewhere must not lock every player out.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn remaining(&self, key: &str, now: Instant) -> Option<Duration> {
        self.entries()
            .get(key)
            .and_then(|ready_at| ready_at.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    /// Checks and starts the cooldown under one lock. `Err` carries the time
    /// left on an existing cooldown, or the whole window if it cannot be
    /// represented from `now`.
    pub fn try_start(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut entries = self.entries();
        if let Some(left) = entries
            .get(key)
            .and_then(|ready_at| ready_at.checked_duration_since(now))
            .filter(|left| !left.is_zero())
        {
            return Err(left);
        }
        let Some(ready_at) = now.checked_add(self.window) else {
            tracing::error!("cooldown window of {:?} overflows the clock, refusing spin", self.window);
            return Err(self.window);
        };
        entries.insert(key.to_string(), ready_at);
        Ok(())
    }

    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, ready_at| *ready_at > now);
        before - entries.len()
    }
}

/// Whole seconds left, rounded up so a live cooldown never reads as zero.
pub fn ceil_secs(duration: Duration) -> i64 {
    let extra = if duration.subsec_nanos() > 0 { 1 } else { 0 };
    i64::try_from(duration.as_secs().saturating_add(extra)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_spin_starts_cooldown() {
        let store = CooldownStore::new(Duration::from_secs(60));
        let now = Instant::now();

        assert_eq!(store.remaining("rider-1", now), None);
        assert!(store.try_start("rider-1", now).is_ok());
        assert_eq!(store.remaining("rider-1", now), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_second_spin_reports_time_left() {
        let store = CooldownStore::new(Duration::from_secs(60));
        let now = Instant::now();
        store.try_start("rider-1", now).unwrap();

        let left = store.try_start("rider-1", now + Duration::from_secs(15)).unwrap_err();
        assert_eq!(left, Duration::from_secs(45));
    }

    #[test]
    fn test_cooldown_expires() {
        let store = CooldownStore::new(Duration::from_secs(60));
        let now = Instant::now();
        store.try_start("rider-1", now).unwrap();

        let later = now + Duration::from_secs(60);
        assert_eq!(store.remaining("rider-1", later), None);
        assert!(store.try_start("rider-1", later).is_ok());
    }

    #[test]
    fn test_players_are_independent() {
        let store = CooldownStore::new(Duration::from_secs(60));
        let now = Instant::now();
        store.try_start("rider-1", now).unwrap();
        assert!(store.try_start("rider-2", now).is_ok());
    }

    #[test]
    fn test_purge_expired() {
        let store = CooldownStore::new(Duration::from_secs(10));
        let now = Instant::now();
        store.try_start("a", now).unwrap();
        store.try_start("b", now + Duration::from_secs(5)).unwrap();

        assert_eq!(store.purge_expired(now + Duration::from_secs(12)), 1);
        assert!(store.remaining("b", now + Duration::from_secs(12)).is_some());
    }

    #[test]
    fn test_unrepresentable_window_refuses_without_panicking() {
        let store = CooldownStore::new(Duration::MAX);
        let now = Instant::now();

        assert_eq!(store.try_start("rider-1", now), Err(Duration::MAX));
        assert_eq!(store.remaining("rider-1", now), None);
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_secs(5)), 5);
        assert_eq!(ceil_secs(Duration::from_millis(5_001)), 6);
        assert_eq!(ceil_secs(Duration::MAX), i64::MAX);
    }
}
