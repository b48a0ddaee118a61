//! Chat Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-server --bin chat-server
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`). The
//! operator console reads from stdin.

use chat_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing
    let tracing_config = config
        .as_ref()
        .map(|config| TracingConfig::for_environment(config.app.env))
        .unwrap_or_default();
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    // Run the server
    if let Err(e) = chat_server::run(config).await {
        error!(error = %e, code = e.error_code(), "Chat server failed");
        std::process::exit(1);
    }
}
