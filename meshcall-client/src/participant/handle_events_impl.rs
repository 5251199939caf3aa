use crate::capture::MediaCapture;
use crate::channel::ChannelEvent;
use crate::engine::{EngineEvent, MediaEngine, PeerConnection};
use crate::error::ClientError;
use crate::participant::ParticipantController;
use crate::peer::{PeerSession, Role};
use meshcall_core::{ClientMessage, PeerId, ServerMessage};
use tracing::{debug, error, info, warn};

impl<E, C> ParticipantController<E, C>
where
    E: MediaEngine,
    C: MediaCapture<Track = E::Track>,
{
    pub async fn handle_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Welcome {
                peer_id,
                ice_servers,
            } => {
                info!("Relay assigned id {}", peer_id);
                self.local_id = Some(peer_id);
                if !ice_servers.is_empty() {
                    self.ice_servers = ice_servers;
                }
            }

            ServerMessage::ShareRooms { rooms } => {
                debug!("{} rooms available", rooms.len());
                self.available_rooms = rooms;
            }

            ServerMessage::AddPeer {
                peer_id,
                create_offer,
            } => {
                self.add_peer(peer_id, Role::from_create_offer(create_offer))
                    .await
            }

            ServerMessage::RemovePeer { peer_id } => self.close_peer(&peer_id).await,

            ServerMessage::SessionDescription {
                peer_id,
                session_description,
            } => {
                let Some(session) = self.peers.get_mut(&peer_id) else {
                    debug!("Description from unknown peer {}", peer_id);
                    return;
                };
                if let Err(e) = session.on_remote_description(session_description).await {
                    report(peer_id, e);
                }
            }

            ServerMessage::IceCandidate {
                peer_id,
                ice_candidate,
            } => {
                let Some(session) = self.peers.get_mut(&peer_id) else {
                    debug!("Candidate from unknown peer {}", peer_id);
                    return;
                };
                if let Err(e) = session.on_remote_candidate(ice_candidate).await {
                    report(peer_id, e);
                }
            }
        }
    }

    async fn add_peer(&mut self, peer_id: PeerId, role: Role) {
        let Some(guard) = self.active_visit() else {
            debug!("Ignoring add-peer for {}: not in a room", peer_id);
            return;
        };
        if self.local_id == Some(peer_id) {
            warn!("Relay announced ourselves as a peer");
            return;
        }
        if self.peers.get(&peer_id).is_some_and(|session| session.is_open()) {
            warn!("Peer {} already announced, ignoring", peer_id);
            return;
        }

        let connection = match self
            .engine
            .create_connection(peer_id, &self.ice_servers, self.engine_tx.clone())
            .await
        {
            Ok(connection) => connection,
            Err(e) => {
                error!("Failed to create connection to {}: {}", peer_id, e);
                return;
            }
        };
        if !guard.is_current() {
            let _ = connection.close().await;
            return;
        }

        if let Some(stream) = &self.local_stream
            && let Err(e) = connection.add_local_stream(stream).await
        {
            warn!("Failed to attach local media for {}: {}", peer_id, e);
        }

        info!("Peer {} announced as {:?}", peer_id, role);
        let mut session = PeerSession::new(peer_id, role, connection, self.sink.clone(), guard);
        let result = session.negotiate().await;
        self.peers.insert(peer_id, session);

        if let Err(e) = result {
            report(peer_id, e);
        }
    }

    pub async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::CandidateGenerated { peer_id, candidate } => {
                if !self.peers.get(&peer_id).is_some_and(|session| session.is_open()) {
                    debug!("Dropping local candidate for departed peer {}", peer_id);
                    return;
                }
                if let Err(e) = self.sink.send(ClientMessage::RelayIce {
                    peer_id,
                    ice_candidate: candidate,
                }) {
                    debug!("Candidate for {} not sent: {}", peer_id, e);
                }
            }

            EngineEvent::RemoteStream { peer_id, stream } => {
                let Some(session) = self.peers.get_mut(&peer_id) else {
                    debug!("Media from unknown peer {}", peer_id);
                    return;
                };
                if session.on_remote_stream(stream) {
                    self.roster.add_remote(peer_id);
                }
            }
        }
    }

    pub async fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connected => {
                // The relay keeps nothing across reconnects
                if let Err(e) = self.sink.send(ClientMessage::GetRooms) {
                    warn!("Failed to request rooms: {}", e);
                }
                if let Some(room) = self.room.clone()
                    && self.active_visit().is_some()
                    && let Err(e) = self.sink.send(ClientMessage::Join { room })
                {
                    warn!("Failed to rejoin: {}", e);
                }
            }

            ChannelEvent::Message(message) => self.handle_server_message(message).await,

            ChannelEvent::Disconnected => {
                warn!("Relay connection lost, dropping {} sessions", self.peers.len());
                self.local_id = None;
                self.close_all_sessions().await;
            }

            ChannelEvent::GaveUp => {
                error!("Relay unreachable, leaving room");
                self.leave_room().await;
            }
        }
    }
}

fn report(peer_id: PeerId, e: ClientError) {
    match e {
        ClientError::Cancelled => debug!("Negotiation with {} cancelled", peer_id),
        e => warn!("Negotiation with {} failed: {}", peer_id, e),
    }
}
