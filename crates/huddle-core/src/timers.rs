//! Keyed deadline registry.
//!
//! Stands in for the host's timer service inside the pure state machine: the
//! registry only records deadlines, and whoever drives the machine calls
//! [`TimerRegistry::take_due`] with the current time. Each key holds at most
//! one deadline; scheduling an existing key cancels and replaces it, which is
//! exactly the trailing-edge debounce the join/leave batches need.

use std::collections::BTreeMap;

/// Registry of pending deadlines, each carrying a value.
#[derive(Debug, Clone)]
pub struct TimerRegistry<K, I, V = ()> {
    entries: BTreeMap<K, (I, V)>,
}

impl<K, I, V> Default for TimerRegistry<K, I, V> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<K, I, V> TimerRegistry<K, I, V>
where
    K: Ord + Clone,
    I: Copy + Ord,
{
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to fire at `deadline`.
    ///
    /// Returns `true` if an existing deadline for `key` was replaced.
    pub fn schedule(&mut self, key: K, deadline: I, value: V) -> bool {
        self.entries.insert(key, (deadline, value)).is_some()
    }

    /// Disarm `key`. Returns the value it carried.
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Disarm everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Deadline armed for `key`.
    pub fn deadline(&self, key: &K) -> Option<I> {
        self.entries.get(key).map(|(deadline, _)| *deadline)
    }

    /// Whether `key` is armed.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<I> {
        self.entries.values().map(|(deadline, _)| *deadline).min()
    }

    /// Remove and return every entry whose deadline is at or before `now`,
    /// ordered by deadline (ties in key order).
    pub fn take_due(&mut self, now: I) -> Vec<(I, K, V)> {
        let keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();

        let mut due: Vec<(I, K, V)> = keys
            .into_iter()
            .filter_map(|key| {
                self.entries.remove(&key).map(|(deadline, value)| (deadline, key, value))
            })
            .collect();
        due.sort_by_key(|(deadline, _, _)| *deadline);
        due
    }

    /// Number of armed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is armed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_replaces_deadline() {
        let mut timers: TimerRegistry<&str, u64> = TimerRegistry::new();

        assert!(!timers.schedule("a", 10, ()));
        assert!(timers.schedule("a", 30, ()));

        assert_eq!(timers.len(), 1);
        assert_eq!(timers.deadline(&"a"), Some(30));
    }

    #[test]
    fn take_due_orders_by_deadline() {
        let mut timers: TimerRegistry<&str, u64, u8> = TimerRegistry::new();
        timers.schedule("late", 20, 2);
        timers.schedule("early", 5, 1);
        timers.schedule("future", 50, 3);

        let due = timers.take_due(20);
        assert_eq!(due, vec![(5, "early", 1), (20, "late", 2)]);
        assert_eq!(timers.next_deadline(), Some(50));
        assert!(timers.take_due(49).is_empty());
    }

    #[test]
    fn cancel_returns_value() {
        let mut timers: TimerRegistry<u32, u64, &str> = TimerRegistry::new();
        timers.schedule(1, 10, "payload");

        assert_eq!(timers.cancel(&1), Some("payload"));
        assert_eq!(timers.cancel(&1), None);
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
    }
}
