//! Server state
//!
//! Shared state cloned into every connection task and the console.

use crate::broadcast::MessageRouter;
use crate::connection::{ConnectionManager, UserRegistry};
use chat_common::AppConfig;
use std::sync::Arc;

/// Server application state
///
/// Holds all shared dependencies for the chat server.
#[derive(Clone)]
pub struct ServerState {
    /// Username registry
    registry: Arc<UserRegistry>,
    /// Message router over the registry
    router: MessageRouter,
    /// Every live connection, named or not
    connection_manager: Arc<ConnectionManager>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl ServerState {
    /// Create a new server state with an empty registry
    pub fn new(config: AppConfig) -> Self {
        let registry = UserRegistry::new_shared();
        Self {
            router: MessageRouter::new(Arc::clone(&registry)),
            registry,
            connection_manager: ConnectionManager::new_shared(),
            config: Arc::new(config),
        }
    }

    /// Get the username registry
    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Get the message router
    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("registry", &self.registry)
            .field("connection_manager", &self.connection_manager)
            .field("config", &"AppConfig")
            .finish()
    }
}
