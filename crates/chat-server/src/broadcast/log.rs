//! Operational message log

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Record a chat line with its sender and the local time
///
/// Emitted on the `chat_log` target so it can be filtered or routed apart
/// from diagnostic output (e.g. `RUST_LOG=chat_log=info`). `None` is the
/// server itself.
pub fn record_message(sender: Option<&str>, text: &str) {
    tracing::info!(
        target: "chat_log",
        sender = sender.unwrap_or("Server"),
        at = %timestamp(),
        text = %text,
        "Message"
    );
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
