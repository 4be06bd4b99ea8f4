//! TCP server
//!
//! Accepts connections, reads the role line and hands the connection to the
//! player or spectator loop. Each connection gets a writer task fed through an
//! unbounded channel of ready-made lines.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::manager::SessionManager;
use crate::protocol::{self, ProtocolError, Role, SpectatorRequest};
use crate::session::SessionHandle;

type LineSender = mpsc::UnboundedSender<String>;
type LineReader = BufReader<OwnedReadHalf>;

/// Bind and serve until the accept loop fails.
///
/// `ready_tx` receives the bound address, which is how callers learn the
/// port when configured with port 0.
pub async fn run_server(
    config: ServerConfig,
    manager: SessionManager,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;
    log::info!("listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    serve(listener, manager).await
}

pub async fn serve(listener: TcpListener, manager: SessionManager) -> anyhow::Result<()> {
    let mut client_id_counter = 0usize;

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        log::info!("client {} connected from {}", client_id, addr);

        let manager = manager.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, manager).await {
                log::warn!("client {} error: {:#}", client_id, e);
            }
            log::info!("client {} disconnected", client_id);
        });
    }
}

async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    manager: SessionManager,
) -> anyhow::Result<()> {
    let (reader, writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let write_task = tokio::spawn(write_lines(writer, rx));

    let result = dispatch(&mut reader, tx, client_id, &manager).await;

    // Every line sender is gone by now; the writer drains and shuts down.
    let _ = write_task.await;
    result
}

async fn dispatch(
    reader: &mut LineReader,
    tx: LineSender,
    client_id: usize,
    manager: &SessionManager,
) -> anyhow::Result<()> {
    let Some(line) = read_request(reader).await? else {
        return Ok(());
    };

    match Role::parse(&line) {
        Ok(Role::Player) => play(reader, tx, client_id, manager).await,
        Ok(Role::Spectator) => spectate(reader, tx, client_id, manager).await,
        Err(e) => {
            log::debug!("client {} sent role {:?}", client_id, line);
            let _ = tx.send(protocol::error_line(e)?);
            Ok(())
        }
    }
}

/// Next non-empty line, trimmed. `None` at end of stream.
async fn read_request(reader: &mut LineReader) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(Some(trimmed.to_string()));
        }
    }
}

async fn write_lines(mut writer: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
        if writer.write_all(b"\n").await.is_err() {
            break;
        }
        if writer.flush().await.is_err() {
            break;
        }
    }
    let _ = writer.shutdown().await;
}

async fn play(
    reader: &mut LineReader,
    tx: LineSender,
    client_id: usize,
    manager: &SessionManager,
) -> anyhow::Result<()> {
    let SessionHandle {
        id,
        commands,
        mut snapshots,
    } = manager.register().await;
    log::info!("client {} plays session {}", client_id, id);

    // Ends when the session task drops its sender (game over or stop).
    let mut forward: JoinHandle<()> = tokio::spawn(async move {
        while let Some(snapshot) = snapshots.recv().await {
            let line = match protocol::snapshot_line(&snapshot) {
                Ok(line) => line,
                Err(e) => {
                    log::error!("snapshot encode failed: {}", e);
                    continue;
                }
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let result = loop {
        tokio::select! {
            _ = &mut forward => break Ok(()),
            request = read_request(reader) => match request {
                Ok(Some(line)) => match protocol::parse_command(&line) {
                    Some(command) => {
                        if commands.send(command).await.is_err() {
                            break Ok(());
                        }
                    }
                    None => log::debug!("client {} sent unknown command {:?}", client_id, line),
                },
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            },
        }
    };

    drop(commands);
    manager.deregister(id).await;
    if !forward.is_finished() {
        let _ = forward.await;
    }
    result
}

async fn spectate(
    reader: &mut LineReader,
    tx: LineSender,
    client_id: usize,
    manager: &SessionManager,
) -> anyhow::Result<()> {
    let mut subscription: Option<JoinHandle<()>> = None;

    let result = loop {
        let line = match read_request(reader).await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };

        let reply = match SpectatorRequest::parse(&line) {
            Ok(SpectatorRequest::ListAlive) => protocol::alive_line(&manager.alive().await)?,
            Ok(SpectatorRequest::Watch(id)) => match manager.watch(id).await {
                Some(mut rx) => {
                    log::info!("client {} watches session {}", client_id, id);
                    if let Some(previous) = subscription.take() {
                        previous.abort();
                    }
                    let tx = tx.clone();
                    subscription = Some(tokio::spawn(async move {
                        loop {
                            match rx.recv().await {
                                Ok(snapshot) => {
                                    let Ok(line) = protocol::snapshot_line(&snapshot) else {
                                        continue;
                                    };
                                    if tx.send(line).is_err() {
                                        break;
                                    }
                                }
                                Err(RecvError::Lagged(skipped)) => {
                                    log::debug!("spectator {} skipped {} snapshots", client_id, skipped);
                                }
                                Err(RecvError::Closed) => break,
                            }
                        }
                    }));
                    continue;
                }
                None => protocol::error_line(ProtocolError::UnknownSession)?,
            },
            Err(e) => protocol::error_line(e)?,
        };

        if tx.send(reply).is_err() {
            break Ok(());
        }
    };

    if let Some(subscription) = subscription {
        subscription.abort();
    }
    result
}
