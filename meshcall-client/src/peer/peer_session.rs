use crate::channel::SignalSink;
use crate::engine::{PeerConnection, RemoteStream};
use crate::peer::{EpochGuard, PeerState, Role};
use meshcall_core::PeerId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Negotiation with one remote peer.
///
/// The controller owns every session and drives them one event at a time,
/// so a session never runs two negotiation steps concurrently.
pub struct PeerSession<P: PeerConnection> {
    pub(super) peer_id: PeerId,
    pub(super) role: Role,
    pub(super) state: PeerState,
    pub(super) connection: P,
    pub(super) sink: Arc<dyn SignalSink>,
    pub(super) guard: EpochGuard,
    pub(super) remote_stream: Option<RemoteStream>,
}

impl<P: PeerConnection> PeerSession<P> {
    pub fn new(
        peer_id: PeerId,
        role: Role,
        connection: P,
        sink: Arc<dyn SignalSink>,
        guard: EpochGuard,
    ) -> Self {
        Self {
            peer_id,
            role,
            state: PeerState::Announced,
            connection,
            sink,
            guard,
            remote_stream: None,
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> PeerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PeerState::Closed
    }

    pub fn remote_stream(&self) -> Option<&RemoteStream> {
        self.remote_stream.as_ref()
    }

    pub fn connection(&self) -> &P {
        &self.connection
    }

    /// Marks the session connected on the first inbound track.
    /// Returns true only for that first transition.
    pub fn on_remote_stream(&mut self, stream: RemoteStream) -> bool {
        match self.state {
            PeerState::Negotiating => {
                debug!("Media from {} arrived, peer is connected", self.peer_id);
                self.remote_stream = Some(stream);
                self.state = PeerState::Connected;
                true
            }
            PeerState::Connected => false,
            PeerState::Announced | PeerState::Closed => {
                debug!(
                    "Ignoring remote stream from {} in state {:?}",
                    self.peer_id, self.state
                );
                false
            }
        }
    }

    /// Releases the engine connection. Closing twice is a no-op.
    pub async fn close(&mut self) {
        if self.state == PeerState::Closed {
            return;
        }

        self.state = PeerState::Closed;
        self.remote_stream = None;
        if let Err(e) = self.connection.close().await {
            warn!("Failed to close connection to {}: {}", self.peer_id, e);
        }
        debug!("Session with {} closed", self.peer_id);
    }
}
