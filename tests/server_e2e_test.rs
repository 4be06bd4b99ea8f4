use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use stackbot::adapter::{run_server, ServerConfig, SessionManager};
use stackbot::core::Snapshot;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr, role: &str) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        let mut client = Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        };
        client.send(role).await;
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn next_line(&mut self) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timeout waiting for line")
            .expect("io error")
    }

    async fn line(&mut self) -> String {
        self.next_line().await.expect("expected line")
    }

    async fn snapshot(&mut self) -> Snapshot {
        serde_json::from_str(&self.line().await).unwrap()
    }

    async fn json(&mut self) -> serde_json::Value {
        serde_json::from_str(&self.line().await).unwrap()
    }
}

async fn start_server(gravity: Duration) -> (SocketAddr, SessionManager) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        gravity,
        seed: Some(3),
        ..ServerConfig::default()
    };
    let manager = SessionManager::from_config(&config);
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_manager = manager.clone();
    tokio::spawn(async move {
        let _ = run_server(config, server_manager, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .unwrap()
        .unwrap();
    (addr, manager)
}

#[tokio::test]
async fn player_receives_snapshots_for_commands() {
    let (addr, manager) = start_server(Duration::from_secs(60)).await;
    let mut player = Client::connect(addr, "play").await;

    let spawn = player.snapshot().await;
    assert!(spawn.is_spawn());
    let live = spawn.live.unwrap();
    assert_eq!((live.rotation, live.x), (0, 4));

    // Unknown commands are ignored without a reply
    player.send("hold").await;
    player.send("left").await;
    let moved = player.snapshot().await;
    assert_eq!(moved.live.unwrap().x, 3);
    assert!(moved.board.is_none());
    assert_eq!(moved.next, spawn.next);

    player.send("drop").await;
    let lock = player.snapshot().await;
    assert!(lock.is_lock());
    assert_eq!(lock.live.unwrap().drop_distance, 0);
    let respawn = player.snapshot().await;
    assert!(respawn.is_spawn());
    assert_eq!(Some(respawn.live.unwrap().kind), spawn.next);

    manager.shutdown().await;
}

#[tokio::test]
async fn gravity_moves_the_piece_without_commands() {
    let (addr, manager) = start_server(Duration::from_millis(20)).await;
    let mut player = Client::connect(addr, "play").await;

    let spawn = player.snapshot().await;
    let fell = player.snapshot().await;
    assert_eq!(fell.live.unwrap().y, spawn.live.unwrap().y + 1);

    manager.shutdown().await;
}

#[tokio::test]
async fn game_over_closes_the_connection() {
    let (addr, _manager) = start_server(Duration::from_millis(1)).await;
    let mut player = Client::connect(addr, "play").await;

    let mut last = None;
    while let Some(line) = player.next_line().await {
        last = Some(line);
    }
    assert_eq!(last.as_deref(), Some(r#"{"event":"gameover"}"#));
}

#[tokio::test]
async fn spectator_lists_and_follows_a_session() {
    let (addr, manager) = start_server(Duration::from_secs(60)).await;

    let mut player = Client::connect(addr, "play").await;
    player.snapshot().await;

    let mut spectator = Client::connect(addr, "watch").await;
    spectator.send("?").await;
    assert_eq!(spectator.json().await, serde_json::json!({ "alive": [1] }));

    // The list reply after the subscribe proves the subscription is in place.
    spectator.send("1").await;
    spectator.send("?").await;
    assert_eq!(spectator.json().await, serde_json::json!({ "alive": [1] }));

    player.send("right").await;
    let played = player.snapshot().await;
    let seen = spectator.snapshot().await;
    assert_eq!(seen, played);
    assert_eq!(seen.live.unwrap().x, 5);

    manager.shutdown().await;
}

#[tokio::test]
async fn spectator_errors() {
    let (addr, manager) = start_server(Duration::from_secs(60)).await;
    let mut spectator = Client::connect(addr, "watch").await;

    spectator.send("42").await;
    let reply = spectator.json().await;
    assert_eq!(reply["error"]["code"], "unknown_session");

    spectator.send("everything").await;
    let reply = spectator.json().await;
    assert_eq!(reply["error"]["code"], "bad_request");

    // Still connected
    spectator.send("?").await;
    assert_eq!(spectator.json().await, serde_json::json!({ "alive": [] }));

    manager.shutdown().await;
}

#[tokio::test]
async fn unknown_role_is_refused() {
    let (addr, _manager) = start_server(Duration::from_secs(60)).await;
    let mut client = Client::connect(addr, "hello").await;

    let reply = client.json().await;
    assert_eq!(reply["error"]["code"], "unknown_role");
    assert_eq!(client.next_line().await, None);
}

#[tokio::test]
async fn disconnecting_player_deregisters_its_session() {
    let (addr, manager) = start_server(Duration::from_secs(60)).await;

    let mut player = Client::connect(addr, "play").await;
    player.snapshot().await;
    assert_eq!(manager.alive().await.len(), 1);
    drop(player);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !manager.alive().await.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("session still alive after disconnect");
}
