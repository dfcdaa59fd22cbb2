//! Busy markers for in-flight mutations

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use console_domain::{ConsoleError, ConsoleResult};
use parking_lot::Mutex;

/// What a mutation locks
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MutationTarget {
    /// A single entity, by identifier.
    Item(String),
    /// The whole collection (bulk operations).
    Collection,
}

impl MutationTarget {
    pub fn item(id: impl Into<String>) -> Self {
        Self::Item(id.into())
    }
}

impl fmt::Display for MutationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::Collection => write!(f, "*"),
        }
    }
}

#[derive(Debug, Default)]
struct BusyState {
    items: BTreeSet<String>,
    collection: bool,
}

/// Set of targets with a mutation in flight
///
/// Clones share the same markers. The collection lock and item locks exclude
/// each other: a bulk operation cannot start while any item is busy, and no
/// item can start while a bulk operation runs.
#[derive(Debug, Clone, Default)]
pub struct BusySet {
    inner: Arc<Mutex<BusyState>>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `target` busy, or fail with `Busy` if it conflicts with a
    /// mutation already in flight.
    pub fn try_acquire(&self, target: MutationTarget) -> ConsoleResult<BusyGuard> {
        let mut state = self.inner.lock();
        let acquired = match &target {
            MutationTarget::Item(id) => !state.collection && state.items.insert(id.clone()),
            MutationTarget::Collection => {
                let free = !state.collection && state.items.is_empty();
                if free {
                    state.collection = true;
                }
                free
            }
        };

        if acquired {
            Ok(BusyGuard { set: self.clone(), target })
        } else {
            Err(ConsoleError::busy(target.to_string()))
        }
    }

    /// Whether a request for `target` would currently be refused.
    pub fn is_busy(&self, target: &MutationTarget) -> bool {
        let state = self.inner.lock();
        match target {
            MutationTarget::Item(id) => state.collection || state.items.contains(id),
            MutationTarget::Collection => state.collection || !state.items.is_empty(),
        }
    }

    pub fn is_idle(&self) -> bool {
        let state = self.inner.lock();
        !state.collection && state.items.is_empty()
    }

    /// Identifiers with an item mutation in flight, sorted.
    pub fn busy_items(&self) -> Vec<String> {
        self.inner.lock().items.iter().cloned().collect()
    }

    fn release(&self, target: &MutationTarget) {
        let mut state = self.inner.lock();
        match target {
            MutationTarget::Item(id) => {
                state.items.remove(id);
            }
            MutationTarget::Collection => state.collection = false,
        }
    }
}

/// Clears its busy marker when dropped, on every exit path.
#[derive(Debug)]
#[must_use = "the target is released as soon as the guard is dropped"]
pub struct BusyGuard {
    set: BusySet,
    target: MutationTarget,
}

impl BusyGuard {
    pub fn target(&self) -> &MutationTarget {
        &self.target
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.set.release(&self.target);
    }
}
