//! # chat-core
//!
//! Domain layer containing the username value object, the client and operator
//! command grammars, and the texts the server sends to clients.
//! This crate has zero dependencies on infrastructure (sockets, runtime, etc.).

pub mod command;
pub mod error;
pub mod notice;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use command::{ClientCommand, OperatorCommand};
pub use error::DomainError;
pub use notice::Envelope;
pub use value_objects::Username;
