//! Terminal chat client
//!
//! Prints every frame the server sends and forwards stdin lines as frames.
//!
//! ```bash
//! cargo run -p chat-server --bin chat-client -- alice --host 127.0.0.1 --port 8080
//! ```

use chat_common::try_init_tracing;
use chat_core::ClientCommand;
use chat_server::frame_transport;
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

/// How long to wait for the server's last frames after `/quit`
const QUIT_GRACE: Duration = Duration::from_secs(2);

/// Chat client
#[derive(Parser, Debug)]
#[command(name = "chat-client")]
#[command(about = "Connect to a chat server from the terminal")]
#[command(version)]
struct Args {
    /// Username to send as soon as the server asks for one
    name: Option<String>,

    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let stream = TcpStream::connect((args.host.as_str(), args.port)).await?;
    println!("Connected to {}:{}", args.host, args.port);

    let (mut sink, mut frames) = frame_transport(stream).split();

    let mut reader = tokio::spawn(async move {
        while let Some(frame) = frames.next().await {
            match frame {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    tracing::debug!(error = %e, "Read failed");
                    break;
                }
            }
        }
    });

    if let Some(name) = args.name.filter(|name| !name.trim().is_empty()) {
        sink.send(name).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let server_closed = loop {
        tokio::select! {
            _ = &mut reader => break true,
            line = lines.next_line() => {
                let Some(line) = line? else { break false };
                let quit = ClientCommand::parse(&line).is_some_and(|command| command.is_quit());
                sink.send(line).await?;
                if quit {
                    break false;
                }
            }
        }
    };

    if server_closed {
        println!("Disconnected by the server.");
    } else if tokio::time::timeout(QUIT_GRACE, &mut reader).await.is_err() {
        tracing::debug!("Server did not close the connection in time");
        reader.abort();
    }

    if let Err(e) = sink.close().await {
        tracing::debug!(error = %e, "Error closing connection");
    }

    Ok(())
}
