//! Integration test utilities for the chat server
//!
//! This crate provides helpers for running end-to-end tests against a
//! real TCP listener.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
