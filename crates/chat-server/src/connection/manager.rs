//! Connection manager
//!
//! Tracks every live connection, named or not, using DashMap for thread-safe
//! access. The user registry only knows sessions that have picked a name; this
//! is what lets shutdown reach the ones still at the prompt.

use super::SessionHandle;
use dashmap::DashMap;
use std::sync::Arc;

/// Manages all active connections
pub struct ConnectionManager {
    /// Active connections by session ID
    connections: DashMap<String, SessionHandle>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(&self, handle: &SessionHandle) {
        self.connections
            .insert(handle.session_id().to_string(), handle.clone());

        tracing::debug!(session_id = %handle.session_id(), "Connection added");
    }

    /// Remove a connection
    pub fn remove_connection(&self, session_id: &str) -> Option<SessionHandle> {
        let removed = self.connections.remove(session_id).map(|(_, handle)| handle);

        if removed.is_some() {
            tracing::debug!(session_id = %session_id, "Connection removed");
        }

        removed
    }

    /// Get a connection by session ID
    pub fn get_connection(&self, session_id: &str) -> Option<SessionHandle> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Force every live connection closed
    ///
    /// Returns how many were signalled. Frames already queued are still
    /// flushed by each writer.
    pub fn close_all(&self) -> usize {
        let handles: Vec<SessionHandle> =
            self.connections.iter().map(|r| r.value().clone()).collect();

        for handle in &handles {
            handle.force_close();
        }

        if !handles.is_empty() {
            tracing::info!(count = handles.len(), "Closed all connections");
        }

        handles.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_manager_creation() {
        let manager = ConnectionManager::new();
        assert_eq!(manager.connection_count(), 0);
    }

    #[test]
    fn test_add_remove_connection() {
        let manager = ConnectionManager::new();
        let (handle, _rx) = SessionHandle::with_id("session1".to_string(), 10);

        manager.add_connection(&handle);
        assert_eq!(manager.connection_count(), 1);
        assert!(manager.has_session("session1"));
        assert!(manager
            .get_connection("session1")
            .unwrap()
            .same_session(&handle));

        assert!(manager.remove_connection("session1").is_some());
        assert!(manager.remove_connection("session1").is_none());
        assert_eq!(manager.connection_count(), 0);
        assert!(!manager.has_session("session1"));
    }

    #[test]
    fn test_close_all_signals_every_connection() {
        let manager = ConnectionManager::new();
        let (first, _rx1) = SessionHandle::new(10);
        let (second, _rx2) = SessionHandle::new(10);

        manager.add_connection(&first);
        manager.add_connection(&second);

        assert_eq!(manager.close_all(), 2);
        assert!(first.is_closed());
        assert!(second.is_closed());
    }
}
