//! WebSocket accept loop and per-connection pump tasks
//!
//! One long-lived bidirectional channel per subscriber, opened over a
//! plain TCP + WebSocket handshake. There is a single logical endpoint:
//! no paths, no topics. Subscribers only receive; inbound frames are
//! drained solely to drive the close handshake.

use crate::client_manager::ClientManager;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, warn};
use shared::ServerMessage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message;

/// Accepts subscriber connections until the task is dropped. Each
/// connection runs in its own task; a failed handshake never affects the
/// accept loop or other subscribers.
pub async fn serve(listener: TcpListener, clients: Arc<RwLock<ClientManager>>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let clients = Arc::clone(&clients);
                tokio::spawn(async move {
                    handle_connection(stream, addr, clients).await;
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    clients: Arc<RwLock<ClientManager>>,
) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };
    let (mut ws_tx, mut ws_rx) = ws.split();

    // The greeting goes out before the subscriber is registered for
    // broadcasts, so it is always the first frame a subscriber sees.
    let hello = match serde_json::to_string(&ServerMessage::Hello { ok: true }) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to serialize hello: {}", e);
            return;
        }
    };
    if let Err(e) = ws_tx.send(Message::Text(hello)).await {
        warn!("Failed to greet {}: {}", addr, e);
        return;
    }

    let (sender, mut outbound) = ClientManager::outbound_channel();
    let client_id = clients.write().await.add_client(addr, sender);

    // Writer task: drains the outbound queue into the socket. A write
    // error just ends the task; the reader below observes the close and
    // removes the registration.
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if let Err(e) = ws_tx.send(frame).await {
                debug!("Write to client {} failed: {}", client_id, e);
                break;
            }
        }
    });

    // No client-to-server messages exist in this protocol; frames are
    // consumed only until the peer closes or the connection errors.
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    clients.write().await.remove_client(&client_id);
    writer.abort();
}
