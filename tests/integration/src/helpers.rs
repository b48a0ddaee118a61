//! Test helpers for integration tests
//!
//! Provides a server bound to an ephemeral port and a framed TCP client with
//! timed reads.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chat_common::{AppConfig, AppResult};
use chat_core::notice;
use chat_server::{serve, FrameCodec, KickOutcome, ServerState};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

/// How long a client waits for an expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    state: ServerState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<AppResult<()>>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = ServerState::new(config);
        let (shutdown, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve(listener, state.clone(), async {
            let _ = stopped.await;
        }));

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown),
            handle,
        })
    }

    /// Shared server state, for inspecting the registry
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Open a connection without registering
    pub async fn connect(&self) -> Result<TestClient> {
        TestClient::connect(self.addr).await
    }

    /// Open a connection and register `name`
    pub async fn join(&self, name: &str) -> Result<TestClient> {
        let mut client = self.connect().await?;
        client.register(name).await?;
        Ok(client)
    }

    /// Kick a user as the operator would
    pub fn kick(&self, name: &str) -> KickOutcome {
        self.state.router().kick(name)
    }

    /// Trigger shutdown and wait for the server to stop
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let served = tokio::time::timeout(RECV_TIMEOUT, &mut self.handle)
            .await
            .context("server did not stop")??;
        served?;
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Chat client speaking the wire protocol over TCP
pub struct TestClient {
    framed: Framed<TcpStream, FrameCodec>,
}

impl TestClient {
    /// Connect to a server
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            framed: chat_server::frame_transport(stream),
        })
    }

    /// Send one frame
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.framed.send(text.to_string()).await?;
        Ok(())
    }

    /// Next frame, `None` if the server closed the connection
    pub async fn recv(&mut self) -> Result<Option<String>> {
        let frame = tokio::time::timeout(RECV_TIMEOUT, self.framed.next())
            .await
            .context("timed out waiting for a frame")?;
        Ok(frame.transpose()?)
    }

    /// Next frame, failing if the connection closed
    pub async fn expect_frame(&mut self) -> Result<String> {
        match self.recv().await? {
            Some(frame) => Ok(frame),
            None => bail!("connection closed while expecting a frame"),
        }
    }

    /// Skip frames until one contains `needle`
    pub async fn expect_frame_containing(&mut self, needle: &str) -> Result<String> {
        loop {
            let frame = self.expect_frame().await?;
            if frame.contains(needle) {
                return Ok(frame);
            }
        }
    }

    /// Read until the server closes the connection
    pub async fn expect_closed(&mut self) -> Result<Vec<String>> {
        let mut trailing = Vec::new();
        while let Some(frame) = self.recv().await? {
            trailing.push(frame);
        }
        Ok(trailing)
    }

    /// Every frame that arrives within `window`
    pub async fn frames_within(&mut self, window: Duration) -> Result<Vec<String>> {
        let mut frames = Vec::new();
        let deadline = tokio::time::Instant::now() + window;
        while let Ok(frame) = tokio::time::timeout_at(deadline, self.framed.next()).await {
            match frame {
                Some(frame) => frames.push(frame?),
                None => break,
            }
        }
        Ok(frames)
    }

    /// Answer the username prompt and wait for the join announcement
    pub async fn register(&mut self, name: &str) -> Result<()> {
        let prompt = self.expect_frame().await?;
        if prompt != notice::USERNAME_PROMPT {
            bail!("expected username prompt, got {prompt:?}");
        }

        self.send(name).await?;
        let reply = self.expect_frame().await?;
        if reply != notice::USERNAME_ACCEPTED {
            bail!("username {name:?} not accepted: {reply:?}");
        }

        self.expect_frame_containing(&notice::joined(name.trim()))
            .await?;
        Ok(())
    }
}

/// Create a test configuration
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config
}
