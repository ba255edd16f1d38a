use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::debug;

use crate::metrics;

pub type SessionId = u64;

#[derive(Debug)]
struct SessionHandle {
    id: SessionId,
    cancel: oneshot::Sender<()>,
}

/// Live sessions keyed by source identifier, at most one per source.
///
/// Clones share the same table. Separate `SessionRegistry::new()` values are
/// fully independent.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SessionHandle>>,
    next_id: Arc<AtomicU64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `source`, or returns `None` if a session already holds it.
    pub(crate) fn try_register(
        &self,
        source: &str,
        cancel: oneshot::Sender<()>,
    ) -> Option<SessionId> {
        match self.sessions.entry(source.to_owned()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                slot.insert(SessionHandle { id, cancel });
                metrics::session_opened();
                Some(id)
            }
        }
    }

    /// Removes the entry for `source` only if it still belongs to session `id`.
    pub(crate) fn release(&self, source: &str, id: SessionId) -> bool {
        let released = self
            .sessions
            .remove_if(source, |_, handle| handle.id == id)
            .is_some();
        if released {
            metrics::session_closed();
        }
        released
    }

    /// Signals the session for `source` to stop and frees the identifier at once.
    pub fn cancel(&self, source: &str) -> bool {
        match self.sessions.remove(source) {
            Some((_, handle)) => {
                metrics::session_closed();
                // the session may have finished on its own in the meantime
                let _ = handle.cancel.send(());
                debug!(source, session = handle.id, "Session cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels every session, returning how many were live.
    pub fn cancel_all(&self) -> usize {
        self.sources()
            .iter()
            .filter(|source| self.cancel(source))
            .count()
    }

    pub fn is_active(&self, source: &str) -> bool {
        self.sessions.contains_key(source)
    }

    pub fn sources(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
