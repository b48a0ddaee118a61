//! Operator console
//!
//! Reads operator lines and turns them into router calls. Replies go to the
//! operator's output only, never to chat users.

use crate::broadcast::{KickOutcome, MessageRouter};
use chat_core::{notice, OperatorCommand};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Operator command loop over any line source
pub struct ConsoleCommandSource<R, W> {
    input: R,
    output: W,
    router: MessageRouter,
}

impl<R, W> ConsoleCommandSource<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a console over `input` and `output`
    pub fn new(input: R, output: W, router: MessageRouter) -> Self {
        Self {
            input,
            output,
            router,
        }
    }

    /// Print the banner and execute lines until end of input
    ///
    /// Only a failing operator output ends the loop early.
    pub async fn run(self) -> io::Result<W> {
        let Self {
            input,
            mut output,
            router,
        } = self;

        write_line(&mut output, notice::OPERATOR_HELP).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            execute(&router, &mut output, &line).await?;
        }

        tracing::info!("Console input closed");
        Ok(output)
    }
}

async fn execute<W>(router: &MessageRouter, output: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let Some(command) = OperatorCommand::parse(line) else {
        return Ok(());
    };

    match command {
        OperatorCommand::Kick(username) => {
            let reply = match router.kick(username) {
                KickOutcome::Kicked => notice::removed(username),
                KickOutcome::NotFound => notice::user_not_found(username),
                KickOutcome::AlreadyLeaving => format!("{username} is already leaving."),
            };
            write_line(output, &reply).await
        }
        OperatorCommand::KickUsage => write_line(output, notice::KICK_USAGE).await,
        OperatorCommand::Broadcast(text) => {
            router.announce(text);
            Ok(())
        }
    }
}

async fn write_line<W>(output: &mut W, text: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
