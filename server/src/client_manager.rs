//! Subscriber registry and best-effort fanout for the broadcast server
//!
//! This module handles the server-side bookkeeping of connected
//! subscribers, including:
//! - Subscriber lifecycle (register on connect, remove on disconnect)
//! - Per-subscriber outbound frame queues
//! - Best-effort broadcast delivery that skips unwritable subscribers
//!
//! A subscriber carries no state beyond its transport handle: there is no
//! acknowledgment, replay, or backlog. A subscriber whose queue is full or
//! closed is skipped for that frame only; actual removal is performed by
//! the connection task that owns the socket.

use log::{debug, info};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Message;

/// Outbound frames buffered per subscriber before its writer task drains
/// them to the socket. Two frames go out per tick, so this queue absorbs
/// several seconds of stalled writes before frames start dropping.
pub const OUTBOUND_QUEUE_FRAMES: usize = 32;

/// A connected subscriber: an identifier for logging plus the sending end
/// of its outbound frame queue.
#[derive(Debug)]
pub struct Client {
    /// Unique subscriber identifier assigned by the registry.
    pub id: u32,
    /// Peer address, for logs only.
    pub addr: SocketAddr,
    sender: mpsc::Sender<Message>,
}

/// Registry of all connected subscribers.
///
/// Shared between the accept loop (which registers and removes) and the
/// broadcast loop (which only iterates to send). Subscriber IDs start at 1
/// and increment for each new connection.
pub struct ClientManager {
    clients: HashMap<u32, Client>,
    next_client_id: u32,
}

impl ClientManager {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
        }
    }

    /// Creates the outbound queue pair for a new connection. The receiving
    /// end goes to the connection's writer task, the sending end into the
    /// registry via [`add_client`](Self::add_client).
    pub fn outbound_channel() -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
        mpsc::channel(OUTBOUND_QUEUE_FRAMES)
    }

    /// Registers a new subscriber and returns its assigned ID.
    pub fn add_client(&mut self, addr: SocketAddr, sender: mpsc::Sender<Message>) -> u32 {
        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} connected from {}", client_id, addr);
        self.clients.insert(
            client_id,
            Client {
                id: client_id,
                addr,
                sender,
            },
        );

        client_id
    }

    /// Removes a subscriber. Returns true if it was present, false if it
    /// was already gone.
    pub fn remove_client(&mut self, client_id: &u32) -> bool {
        if let Some(client) = self.clients.remove(client_id) {
            info!("Client {} disconnected", client.id);
            true
        } else {
            false
        }
    }

    /// Best-effort fanout of one serialized frame to every subscriber.
    ///
    /// Returns how many subscribers the frame was queued for. A subscriber
    /// with a full queue (too slow) or a closed queue (already gone) is
    /// skipped for this frame only; one bad subscriber never delays the
    /// others or aborts the tick.
    pub fn broadcast(&self, text: &str) -> usize {
        let mut queued = 0;
        for client in self.clients.values() {
            match client.sender.try_send(Message::Text(text.to_owned())) {
                Ok(()) => queued += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("Client {} is lagging, dropping frame", client.id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Client {} queue closed, skipping", client.id);
                }
            }
        }
        queued
    }

    /// Returns the number of currently connected subscribers.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no subscribers are currently connected.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}
