//! Command grammars
//!
//! Classification of raw text lines into commands, for both chat clients and
//! the server operator's console.

mod client;
mod operator;

pub use client::ClientCommand;
pub use operator::OperatorCommand;
