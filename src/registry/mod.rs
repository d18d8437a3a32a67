//! Concurrent subscription registry.
//!
//! Holds the set of Gotify application ids the user is subscribed to.
//! Exactly two actors touch it: the Telegram command adapter (occasional
//! writes) and the stream dispatcher (one read per inbound event). A
//! read-write lock around a `BTreeSet` is plenty for that traffic.
//!
//! Subscriptions live for the process lifetime only; losing them on
//! restart is intentional.

use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

/// Thread-safe set of subscribed application ids.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    apps: RwLock<BTreeSet<i64>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an application. Returns `true` if the id was newly
    /// added, `false` if it was already present.
    pub fn add(&self, app_id: i64) -> bool {
        self.apps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(app_id)
    }

    /// Unsubscribe from an application. Returns `true` if the id was
    /// present.
    pub fn remove(&self, app_id: i64) -> bool {
        self.apps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&app_id)
    }

    /// Whether the given application id is subscribed.
    pub fn contains(&self, app_id: i64) -> bool {
        self.apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&app_id)
    }

    /// Sorted copy of the current members. Callers get a snapshot, never
    /// a view that could race with concurrent writers.
    pub fn snapshot(&self) -> Vec<i64> {
        self.apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn add_then_contains() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.add(7));
        assert!(registry.contains(7));
        assert!(!registry.contains(8));
    }

    #[test]
    fn add_is_idempotent() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.add(3));
        assert!(!registry.add(3));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_then_contains_is_false() {
        let registry = SubscriptionRegistry::new();
        registry.add(5);
        assert!(registry.remove(5));
        assert!(!registry.contains(5));
        assert!(!registry.remove(5));
    }

    #[test]
    fn snapshot_is_sorted_and_detached() {
        let registry = SubscriptionRegistry::new();
        registry.add(9);
        registry.add(1);
        registry.add(4);

        let snap = registry.snapshot();
        assert_eq!(snap, vec![1, 4, 9]);

        // Mutating after the snapshot must not affect it.
        registry.remove(4);
        assert_eq!(snap, vec![1, 4, 9]);
        assert_eq!(registry.snapshot(), vec![1, 9]);
    }

    #[test]
    fn concurrent_access_does_not_corrupt_the_set() {
        let registry = Arc::new(SubscriptionRegistry::new());

        // Ids 0..50 are added by every writer thread and never removed;
        // ids 50..100 are added and then removed by the same thread. Any
        // interleaving must converge to exactly {0..50}.
        let mut handles = Vec::new();
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for id in 0..50 {
                    registry.add(id);
                    registry.contains(id);
                }
                for id in 50..100 {
                    registry.add(id);
                    registry.remove(id);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let expected: Vec<i64> = (0..50).collect();
        assert_eq!(registry.snapshot(), expected);
    }
}
