//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A username no other test in this process uses
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// Frame a server message as clients receive it
pub fn server_frame(text: &str) -> String {
    format!("[Server]: {text}")
}
