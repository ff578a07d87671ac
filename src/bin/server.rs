use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, info, warn};
use turf_duel_server::constants::{TICK_MS, TICK_SECONDS};
use turf_duel_server::engine::GameEngine;
use turf_duel_server::server_protocol::{parse_client_message, ParsedClientMessage};
use turf_duel_server::types::{GameConfig, RosterEntry};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type SharedState = Arc<Mutex<ServerState>>;

#[derive(Clone)]
struct ClientContext {
    tx: mpsc::Sender<OutboundMessage>,
}

#[derive(Clone, Debug)]
enum OutboundMessage {
    Text(String),
    Close { code: u16, reason: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueuePolicy {
    DropOnFull,
    DisconnectOnFull,
}

struct ServerState {
    clients: HashMap<String, ClientContext>,
    engine: GameEngine,
}

impl ServerState {
    fn new() -> Self {
        Self {
            clients: HashMap::new(),
            engine: GameEngine::new(GameConfig::default()),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let state = Arc::new(Mutex::new(ServerState::new()));
    start_tick_loop(state.clone());

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .with_state(state);

    let app = if let Some(static_dir) = resolve_static_dir() {
        let index_file = static_dir.join("index.html");
        info!(root = %static_dir.to_string_lossy(), "serving static files");
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        warn!("no static file root found; set STATIC_DIR to serve a client");
        app
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server socket");

    info!(port, "listening");
    axum::serve(listener, app)
        .await
        .expect("server runtime failed");
}

fn resolve_static_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var("STATIC_DIR") {
        let path = PathBuf::from(raw);
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }
    let fallback = PathBuf::from("public");
    fallback.join("index.html").is_file().then_some(fallback)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: SharedState, socket: WebSocket) {
    let conn_id = make_id("conn");
    let (tx, mut rx) = mpsc::channel::<OutboundMessage>(256);

    {
        let mut guard = state.lock().await;
        let entry = guard.engine.join(&conn_id);
        guard
            .clients
            .insert(conn_id.clone(), ClientContext { tx: tx.clone() });
        info!(conn = %conn_id, role = ?entry.role, team = ?entry.team, "connection joined");

        let init = init_payload(&guard.engine, &entry);
        send_to_client(&mut guard, &conn_id, &init, QueuePolicy::DisconnectOnFull);
        let roster = roster_payload(&guard.engine);
        broadcast(&mut guard, &roster, QueuePolicy::DisconnectOnFull);
    }

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let should_close = matches!(outbound, OutboundMessage::Close { .. });
            let result = match outbound {
                OutboundMessage::Text(payload) => {
                    ws_sender.send(Message::Text(payload.into())).await
                }
                OutboundMessage::Close { code, reason } => {
                    let frame = CloseFrame {
                        code,
                        reason: reason.into(),
                    };
                    ws_sender.send(Message::Close(Some(frame))).await
                }
            };
            if result.is_err() || should_close {
                break;
            }
        }
    });

    while let Some(received) = ws_receiver.next().await {
        let Ok(message) = received else {
            break;
        };
        match message {
            Message::Text(raw) => {
                handle_client_message(state.clone(), &conn_id, raw.to_string()).await;
            }
            Message::Binary(raw) => {
                if let Ok(text) = String::from_utf8(raw.to_vec()) {
                    handle_client_message(state.clone(), &conn_id, text).await;
                } else {
                    debug!(conn = %conn_id, "ignoring non-utf8 binary frame");
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    handle_disconnect(state, &conn_id).await;
    drop(tx);
    let _ = writer.await;
}

async fn handle_client_message(state: SharedState, conn_id: &str, raw: String) {
    let Some(message) = parse_client_message(&raw) else {
        debug!(conn = %conn_id, "dropping unparseable message");
        return;
    };

    match message {
        ParsedClientMessage::Input(update) => {
            let mut guard = state.lock().await;
            guard.engine.receive_input(conn_id, update);
        }
        ParsedClientMessage::Ping { t } => {
            let mut guard = state.lock().await;
            send_to_client(
                &mut guard,
                conn_id,
                &json!({ "type": "pong", "t": t }),
                QueuePolicy::DisconnectOnFull,
            );
        }
    }
}

async fn handle_disconnect(state: SharedState, conn_id: &str) {
    let mut guard = state.lock().await;
    disconnect_client_internal(&mut guard, conn_id, true);
}

// Removal is immediate, never deferred to the tick boundary; the freed team
// slot goes to the next new connection.
fn disconnect_client_internal(state: &mut ServerState, conn_id: &str, broadcast_after: bool) {
    let removed_client = state.clients.remove(conn_id).is_some();
    let removed_player = state.engine.leave(conn_id);
    if !removed_client && !removed_player {
        return;
    }
    info!(conn = %conn_id, "connection left");
    if broadcast_after {
        let roster = roster_payload(&state.engine);
        broadcast(state, &roster, QueuePolicy::DisconnectOnFull);
    }
}

fn init_payload(engine: &GameEngine, entry: &RosterEntry) -> Value {
    json!({
        "type": "init",
        "playerId": entry.id,
        "role": entry.role,
        "team": entry.team,
        "world": engine.world.to_world_init(),
        "config": engine.config,
        "nowMs": engine.current_now_ms(),
    })
}

fn roster_payload(engine: &GameEngine) -> Value {
    json!({
        "type": "roster",
        "players": engine.roster(),
    })
}

fn start_tick_loop(state: SharedState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
        loop {
            interval.tick().await;
            let mut guard = state.lock().await;
            guard.engine.step(TICK_SECONDS);
            if guard.clients.is_empty() {
                continue;
            }
            let snapshot = guard.engine.build_snapshot();
            broadcast(
                &mut guard,
                &json!({ "type": "state", "snapshot": snapshot }),
                QueuePolicy::DropOnFull,
            );
        }
    });
}

fn send_to_client(state: &mut ServerState, conn_id: &str, message: &Value, policy: QueuePolicy) {
    let send_failed = if let Some(client) = state.clients.get(conn_id) {
        client
            .tx
            .try_send(OutboundMessage::Text(message.to_string()))
            .is_err()
    } else {
        false
    };
    if send_failed && policy == QueuePolicy::DisconnectOnFull {
        close_laggard(state, conn_id);
        disconnect_client_internal(state, conn_id, false);
    }
}

fn broadcast(state: &mut ServerState, message: &Value, policy: QueuePolicy) {
    let payload = message.to_string();
    let conn_ids: Vec<String> = state.clients.keys().cloned().collect();
    let mut failed = Vec::new();
    for conn_id in conn_ids {
        let Some(client) = state.clients.get(&conn_id) else {
            continue;
        };
        if client
            .tx
            .try_send(OutboundMessage::Text(payload.clone()))
            .is_err()
            && policy == QueuePolicy::DisconnectOnFull
        {
            failed.push(conn_id);
        }
    }
    for conn_id in failed {
        warn!(conn = %conn_id, "outbound queue full, disconnecting");
        close_laggard(state, &conn_id);
        disconnect_client_internal(state, &conn_id, false);
    }
}

fn close_laggard(state: &ServerState, conn_id: &str) {
    if let Some(client) = state.clients.get(conn_id) {
        let _ = client.tx.try_send(OutboundMessage::Close {
            code: 1008,
            reason: "outbound queue full".to_string(),
        });
    }
}

fn make_id(prefix: &str) -> String {
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{seq}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_id_is_monotonic_and_prefixed() {
        let first = make_id("conn");
        let second = make_id("conn");
        assert!(first.starts_with("conn_"));
        let first_seq: u64 = first.rsplit('_').next().unwrap().parse().unwrap();
        let second_seq: u64 = second.rsplit('_').next().unwrap().parse().unwrap();
        assert!(second_seq > first_seq);
    }

    #[test]
    fn init_payload_carries_identity_map_and_config() {
        let mut engine = GameEngine::new(GameConfig::default());
        let entry = engine.join("conn_test");
        let payload = init_payload(&engine, &entry);
        assert_eq!(payload["type"], "init");
        assert_eq!(payload["playerId"], "conn_test");
        assert_eq!(payload["team"], "red");
        assert_eq!(payload["world"]["cols"], 40);
        assert!(payload["world"]["walls"].as_array().unwrap().len() > 0);
        assert!(payload["config"]["tickRate"].is_number());
    }

    #[test]
    fn roster_payload_lists_every_connection() {
        let mut engine = GameEngine::new(GameConfig::default());
        engine.join("conn_a");
        engine.join("conn_b");
        engine.join("conn_c");
        let payload = roster_payload(&engine);
        let players = payload["players"].as_array().unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[2]["role"], "spectator");
        assert!(players[2]["team"].is_null());
    }
}
