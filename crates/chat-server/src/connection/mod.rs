//! Connection management
//!
//! Session handles, the username registry, and the per-connection writer.

mod handle;
mod manager;
mod registry;
mod writer;

pub use handle::{SendError, SessionHandle};
pub use manager::ConnectionManager;
pub use registry::UserRegistry;
pub(crate) use writer::write_outbound;
