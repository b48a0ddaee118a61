//! User registry
//!
//! The authoritative username → session mapping. All mutations happen under
//! one lock, so two sessions can never end up holding the same name and a
//! rename is never observed half done.

use super::SessionHandle;
use chat_core::{DomainError, Username};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Thread-safe registry of active usernames
#[derive(Default)]
pub struct UserRegistry {
    users: Mutex<HashMap<Username, SessionHandle>>,
}

impl UserRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Claim `name` for a session
    ///
    /// Fails if the name is blank or already taken. Of any number of
    /// concurrent claims on one name, exactly one succeeds.
    pub fn register(&self, name: &str, handle: &SessionHandle) -> Result<Username, DomainError> {
        let username = Username::parse(name)?;

        let mut users = self.users.lock();
        if users.contains_key(&username) {
            return Err(DomainError::UsernameTaken(username.into_inner()));
        }
        users.insert(username.clone(), handle.clone());
        drop(users);

        tracing::debug!(
            session_id = %handle.session_id(),
            username = %username,
            "Username registered"
        );

        Ok(username)
    }

    /// Move a session from `old` to `new` in one step
    ///
    /// Fails, leaving the mapping unchanged, if `new` is blank or taken, or if
    /// `old` no longer belongs to this session (e.g. it was just kicked).
    pub fn rename(
        &self,
        old: &str,
        new: &str,
        handle: &SessionHandle,
    ) -> Result<Username, DomainError> {
        let username = Username::parse(new)?;

        let mut users = self.users.lock();
        if users.contains_key(&username) {
            return Err(DomainError::UsernameTaken(username.into_inner()));
        }
        match users.get(old) {
            Some(current) if current.same_session(handle) => {}
            _ => return Err(DomainError::UserNotFound(old.to_string())),
        }
        users.remove(old);
        users.insert(username.clone(), handle.clone());
        drop(users);

        tracing::debug!(
            session_id = %handle.session_id(),
            old = %old,
            new = %username,
            "Username changed"
        );

        Ok(username)
    }

    /// Remove `name` whoever holds it
    ///
    /// Removing an absent name is a no-op.
    pub fn unregister(&self, name: &str) -> Option<SessionHandle> {
        self.users.lock().remove(name)
    }

    /// Remove `name` only if it still belongs to `handle`
    ///
    /// Returns `true` if this call removed the entry. Both a session's own
    /// cleanup and an operator kick go through here, so whichever runs second
    /// is a no-op, and a newcomer who has since taken the name is left alone.
    pub fn unregister_session(&self, name: &str, handle: &SessionHandle) -> bool {
        let mut users = self.users.lock();
        match users.get(name) {
            Some(current) if current.same_session(handle) => {
                users.remove(name);
                true
            }
            _ => false,
        }
    }

    /// Get the session currently registered under `name`
    pub fn lookup(&self, name: &str) -> Option<SessionHandle> {
        self.users.lock().get(name).cloned()
    }

    /// Point-in-time copy of every registered session
    ///
    /// The lock is released before the caller iterates, so sessions joining
    /// or leaving during a broadcast may or may not see that message.
    pub fn snapshot(&self) -> Vec<SessionHandle> {
        self.users.lock().values().cloned().collect()
    }

    /// Sorted list of registered names
    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .users
            .lock()
            .keys()
            .map(|name| name.as_str().to_string())
            .collect();
        names.sort();
        names
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.users.lock().contains_key(name)
    }

    /// Get the number of registered users
    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    /// Check if no users are registered
    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

impl std::fmt::Debug for UserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRegistry")
            .field("users", &self.len())
            .finish()
    }
}
