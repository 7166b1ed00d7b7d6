//! JSON-lines TCP server for driving an inspector from another process.
//!
//! The server never touches the inspector. `Ping` and `GetState` are answered
//! on the connection task from the last published snapshot; every other
//! command is forwarded to the host, which drains them once per frame.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch, Semaphore};

use crate::protocol::{
    parse_command, InspectorSnapshot, RemoteCommand, RemoteError, RemoteResponse, ResponseData,
};
use crate::DEFAULT_PORT;

/// Listener settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Port on 127.0.0.1; 0 picks a free one
    pub port: u16,
    /// Clients beyond this are sent an error and disconnected
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_connections: 4,
        }
    }
}

/// The connection tasks' view of the host
#[derive(Clone)]
struct Link {
    commands: mpsc::UnboundedSender<RemoteCommand>,
    snapshot: watch::Receiver<InspectorSnapshot>,
}

impl Link {
    fn respond(&self, cmd: RemoteCommand) -> RemoteResponse {
        match cmd {
            RemoteCommand::Ping => RemoteResponse::pong(),
            RemoteCommand::GetState => {
                RemoteResponse::ok(ResponseData::State(self.snapshot.borrow().clone()))
            }
            other => {
                let response = RemoteResponse::queued(&other);
                match self.commands.send(other) {
                    Ok(()) => response,
                    Err(_) => RemoteResponse::error("Inspector is not accepting commands"),
                }
            }
        }
    }
}

/// Running server. Dropping it closes the listener and every open connection.
pub struct RemoteServer {
    addr: SocketAddr,
    commands: mpsc::UnboundedReceiver<RemoteCommand>,
    snapshot: watch::Sender<InspectorSnapshot>,
    shutdown: watch::Sender<bool>,
}

impl RemoteServer {
    /// Bind and start accepting on `runtime`.
    ///
    /// Must not be called from inside an async context: binding blocks on
    /// `runtime` so a port conflict is reported here rather than logged later.
    pub fn start(runtime: &Handle, config: ServerConfig) -> Result<Self, RemoteError> {
        let listener = runtime.block_on(TcpListener::bind(("127.0.0.1", config.port)))?;
        let addr = listener.local_addr()?;

        let (command_tx, commands) = mpsc::unbounded_channel();
        let (snapshot, snapshot_rx) = watch::channel(InspectorSnapshot::default());
        let (shutdown, shutdown_rx) = watch::channel(false);

        let link = Link {
            commands: command_tx,
            snapshot: snapshot_rx,
        };
        let limit = Arc::new(Semaphore::new(config.max_connections));
        runtime.spawn(accept_loop(listener, limit, link, shutdown_rx));

        log::info!(
            "Remote control listening on {} (max {} clients)",
            addr,
            config.max_connections
        );
        Ok(Self {
            addr,
            commands,
            snapshot,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Take every command received since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<RemoteCommand> {
        let mut out = Vec::new();
        while let Ok(cmd) = self.commands.try_recv() {
            out.push(cmd);
        }
        out
    }

    /// Replace the snapshot served to `GetState`.
    pub fn publish(&self, snapshot: InspectorSnapshot) {
        self.snapshot.send_replace(snapshot);
    }
}

impl Drop for RemoteServer {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn accept_loop(
    listener: TcpListener,
    limit: Arc<Semaphore>,
    link: Link,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::error!("Remote control accept error: {}", e);
                        continue;
                    }
                };
                let Ok(permit) = limit.clone().try_acquire_owned() else {
                    log::warn!("Rejecting remote client {}: connection limit reached", peer);
                    tokio::spawn(reject(stream));
                    continue;
                };
                log::info!("Remote client connected from {}", peer);
                let link = link.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_client(stream, link, shutdown).await {
                        log::warn!("Remote client {} failed: {}", peer, e);
                    }
                    drop(permit);
                    log::info!("Remote client disconnected: {}", peer);
                });
            }
        }
    }
    log::info!("Remote control stopped");
}

async fn reject(mut stream: TcpStream) {
    let response = RemoteResponse::error("Too many remote clients");
    if let Err(e) = write_response(&mut stream, &response).await {
        log::debug!("Failed to notify rejected client: {}", e);
    }
}

async fn serve_client(
    stream: TcpStream,
    link: Link,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.changed() => return Ok(()),
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            return Ok(());
        };

        let response = match parse_command(&line) {
            Ok(cmd) => {
                log::debug!("Remote command: {:?}", cmd);
                link.respond(cmd)
            }
            Err(RemoteError::Empty) => continue,
            Err(e) => RemoteResponse::error(e.to_string()),
        };
        write_response(&mut writer, &response).await?;
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &RemoteResponse,
) -> std::io::Result<()> {
    let mut json = serde_json::to_string(response).map_err(std::io::Error::other)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await
}
