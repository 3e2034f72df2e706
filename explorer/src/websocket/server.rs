//! WebSocket server implementation

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use kaspa_hashes::Hash;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::cache::SnapshotCache;
use crate::models::SnapshotEvent;
use crate::websocket::subscriptions::{Subscriptions, BLOCKS_CHANNEL, SNAPSHOT_CHANNEL};

pub fn routes(cache: Arc<SnapshotCache>) -> Router {
    Router::new().route("/ws", get(handle_connection)).with_state(cache)
}

async fn handle_connection(ws: WebSocketUpgrade, State(cache): State<Arc<SnapshotCache>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, cache))
}

async fn handle_socket(socket: WebSocket, cache: Arc<SnapshotCache>) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before reading the current snapshot so nothing published in between is missed.
    let mut events = cache.subscribe();
    let mut feed = Feed::new();

    if let Some(snapshot) = cache.current() {
        if !send_all(&mut sender, feed.on_event(&snapshot.event())).await {
            return;
        }
    }

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if !send_all(&mut sender, feed.on_command(&text)).await {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("websocket receive error: {}", e);
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if !send_all(&mut sender, feed.on_event(&event)).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("live feed client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

async fn send_all(sender: &mut SplitSink<WebSocket, Message>, frames: Vec<String>) -> bool {
    for frame in frames {
        if sender.send(Message::Text(frame)).await.is_err() {
            return false;
        }
    }
    true
}

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WSCommand {
    Subscribe { channel: String },
    Unsubscribe { channel: String },
}

#[derive(Serialize)]
struct WSEvent<'a, T: Serialize> {
    channel: &'a str,
    data: T,
}

/// Per-connection feed state: what the client follows and what it has already seen.
struct Feed {
    subscriptions: Subscriptions,
    last_sequence: u64,
    last_block: Option<Hash>,
}

impl Feed {
    fn new() -> Self {
        Self { subscriptions: Subscriptions::new(), last_sequence: 0, last_block: None }
    }

    fn on_event(&mut self, event: &SnapshotEvent) -> Vec<String> {
        if event.sequence <= self.last_sequence {
            return vec![];
        }
        self.last_sequence = event.sequence;

        let mut frames = vec![];
        if self.subscriptions.contains(SNAPSHOT_CHANNEL) {
            frames.extend(frame(SNAPSHOT_CHANNEL, event));
        }

        let latest = event.latest_block.as_ref();
        let latest_hash = latest.map(|b| b.hash);
        if latest_hash != self.last_block {
            self.last_block = latest_hash;
            if let (Some(block), true) = (latest, self.subscriptions.contains(BLOCKS_CHANNEL)) {
                frames.extend(frame(BLOCKS_CHANNEL, block));
            }
        }
        frames
    }

    fn on_command(&mut self, text: &str) -> Vec<String> {
        let accepted = match serde_json::from_str::<WSCommand>(text) {
            Ok(WSCommand::Subscribe { channel }) => {
                if self.subscriptions.subscribe(&channel) {
                    Ok(())
                } else {
                    Err(format!("unknown channel {}", channel))
                }
            }
            Ok(WSCommand::Unsubscribe { channel }) => {
                self.subscriptions.unsubscribe(&channel);
                Ok(())
            }
            Err(e) => Err(format!("invalid command: {}", e)),
        };

        match accepted {
            Ok(()) => frame("subscriptions", self.subscriptions.channels()).into_iter().collect(),
            Err(message) => frame("error", serde_json::json!({ "message": message })).into_iter().collect(),
        }
    }
}

fn frame<T: Serialize>(channel: &str, data: T) -> Option<String> {
    match serde_json::to_string(&WSEvent { channel, data }) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("failed to encode {} event: {}", channel, e);
            None
        }
    }
}
