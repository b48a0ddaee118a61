//! Message routing
//!
//! Global and private delivery, operator kicks, and the operational log of
//! every chat line.

mod log;
mod router;

pub use log::record_message;
pub(crate) use router::deliver;
pub use router::{KickOutcome, MessageRouter};
