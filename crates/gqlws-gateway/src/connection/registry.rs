//! Subscription registry
//!
//! Tracks the live, cancellable subscriptions of one session using DashMap
//! for thread-safe access.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::AbortHandle;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// A cancellable reference to an in-flight subscription's forwarding future
///
/// Cancelling aborts the forwarding future, which drops the upstream
/// producer promptly. Each handle carries a unique token so a finished
/// operation can remove exactly its own registry entry, never a newer
/// registration that reused the id.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    token: u64,
    abort: AbortHandle,
}

impl SubscriptionHandle {
    /// Wrap an abort handle
    #[must_use]
    pub fn new(abort: AbortHandle) -> Self {
        Self {
            token: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            abort,
        }
    }

    /// Get this handle's unique token
    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Cancel the subscription
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Check if the subscription was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// "Already exists" outcome of [`SubscriptionRegistry::register`]
#[derive(Debug, thiserror::Error)]
#[error("a subscription with id {id} already exists")]
pub struct AlreadyRegistered {
    /// The contested operation id
    pub id: String,
}

/// Registry of live subscriptions keyed by operation id
///
/// Exactly one subscription may exist per id at a time; a duplicate
/// `register` is an error condition, never an overwrite.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: DashMap<String, SubscriptionHandle>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register a subscription under an id
    ///
    /// Atomic test-and-set through the map entry: when two registrations
    /// race on the same id, exactly one wins and the incumbent is never
    /// disturbed.
    pub fn register(
        &self,
        id: impl Into<String>,
        handle: SubscriptionHandle,
    ) -> Result<(), AlreadyRegistered> {
        let id = id.into();
        match self.entries.entry(id.clone()) {
            Entry::Occupied(_) => Err(AlreadyRegistered { id }),
            Entry::Vacant(vacant) => {
                vacant.insert(handle);
                Ok(())
            }
        }
    }

    /// Remove a subscription, returning its handle if present
    ///
    /// Idempotent: removing an unknown id is a no-op.
    pub fn remove(&self, id: &str) -> Option<SubscriptionHandle> {
        self.entries.remove(id).map(|(_, handle)| handle)
    }

    /// Remove the entry under `id` only if it is the given registration
    ///
    /// Used by an operation's own completion path, which must not disturb
    /// a newer subscription that re-used the id after a cancellation.
    pub fn remove_matching(&self, id: &str, token: u64) -> Option<SubscriptionHandle> {
        self.entries
            .remove_if(id, |_, handle| handle.token == token)
            .map(|(_, handle)| handle)
    }

    /// Check if an id is live
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no subscriptions are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancel every subscription best-effort and clear the registry
    pub fn dispose_all(&self) {
        let ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, handle)) = self.entries.remove(&id) {
                handle.cancel();
            }
        }
    }
}
