use crate::room::RelayHandle;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use meshcall_core::{PeerId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
}

/// Live WebSocket outboxes, addressable by peer id.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) relay: RelayHandle,
}

impl SignalingService {
    pub fn new(relay: RelayHandle) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
            relay,
        }
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
    }

    fn encode(msg: &ServerMessage) -> Option<Message> {
        match serde_json::to_string(msg) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                error!("Failed to serialize signal message: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_signal(&self, peer_id: PeerId, msg: ServerMessage) {
        let Some(peer) = self.inner.peers.get(&peer_id) else {
            // Сокет мог закрыться, пока координатор обрабатывал событие
            debug!("Attempted to send signal to disconnected user {}", peer_id);
            return;
        };
        let Some(frame) = Self::encode(&msg) else {
            return;
        };
        if let Err(e) = peer.send(frame) {
            error!("Failed to send WS message to {}: {:?}", peer_id, e);
        }
    }

    async fn broadcast(&self, msg: ServerMessage) {
        let Some(frame) = Self::encode(&msg) else {
            return;
        };
        for peer in self.inner.peers.iter() {
            if peer.value().send(frame.clone()).is_err() {
                debug!("Broadcast skipped closed socket {}", peer.key());
            }
        }
    }
}
