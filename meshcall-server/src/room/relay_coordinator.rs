use crate::room::relay_command::RelayCommand;
use crate::room::room_registry::RoomRegistry;
use crate::signaling::SignalingOutput;
use meshcall_core::{ClientMessage, IceServerConfig, PeerId, RoomId, ServerMessage};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Single owner of the room registry. Every command runs to completion
/// before the next one is read, so membership never changes mid fan-out.
pub struct RelayCoordinator {
    registry: RoomRegistry,
    live: HashSet<PeerId>,
    command_rx: mpsc::Receiver<RelayCommand>,
    signaling: Arc<dyn SignalingOutput>,
    ice_servers: Vec<IceServerConfig>,
}

impl RelayCoordinator {
    pub fn new(
        command_rx: mpsc::Receiver<RelayCommand>,
        signaling: Arc<dyn SignalingOutput>,
        ice_servers: Vec<IceServerConfig>,
    ) -> Self {
        Self {
            registry: RoomRegistry::new(),
            live: HashSet::new(),
            command_rx,
            signaling,
            ice_servers,
        }
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        loop {
            match self.command_rx.recv().await {
                Some(cmd) => self.handle_command(cmd).await,
                None => {
                    info!("Command channel closed. Shutting down relay.");
                    break;
                }
            }
        }

        info!("Relay event loop finished");
    }

    pub async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connected { peer_id } => {
                info!("Peer {} connected", peer_id);
                self.live.insert(peer_id);

                self.deliver(
                    peer_id,
                    ServerMessage::Welcome {
                        peer_id,
                        ice_servers: self.ice_servers.clone(),
                    },
                )
                .await;
                self.share_rooms().await;
            }

            RelayCommand::Message { peer_id, message } => {
                if !self.live.contains(&peer_id) {
                    warn!("Dropping message from unknown connection {}", peer_id);
                    return;
                }
                self.handle_message(peer_id, message).await;
            }

            RelayCommand::Disconnecting { peer_id } => {
                info!("Peer {} disconnecting", peer_id);
                self.leave_rooms(peer_id).await;
                self.live.remove(&peer_id);
            }

            RelayCommand::ListRooms { reply } => {
                let _ = reply.send(self.registry.list_rooms());
            }
        }
    }

    async fn handle_message(&mut self, peer_id: PeerId, message: ClientMessage) {
        match message {
            ClientMessage::Join { room } => self.join_room(peer_id, room).await,

            ClientMessage::Leave => self.leave_rooms(peer_id).await,

            ClientMessage::GetRooms => {
                let rooms = self.registry.list_rooms();
                self.deliver(peer_id, ServerMessage::ShareRooms { rooms })
                    .await;
            }

            ClientMessage::RelaySdp {
                peer_id: target,
                session_description,
            } => {
                let msg = ServerMessage::SessionDescription {
                    peer_id,
                    session_description,
                };
                self.forward(peer_id, target, msg).await;
            }

            ClientMessage::RelayIce {
                peer_id: target,
                ice_candidate,
            } => {
                let msg = ServerMessage::IceCandidate {
                    peer_id,
                    ice_candidate,
                };
                self.forward(peer_id, target, msg).await;
            }
        }
    }

    async fn join_room(&mut self, peer_id: PeerId, room: RoomId) {
        // Snapshot before inserting: only existing members get introduced
        let existing = self.registry.members_of(&room);
        if !self.registry.join(peer_id, room.clone()) {
            warn!("Peer {} already joined to {}", peer_id, room);
            return;
        }

        // Newcomer offers, existing members answer.
        for member in existing {
            self.deliver(
                member,
                ServerMessage::AddPeer {
                    peer_id,
                    create_offer: false,
                },
            )
            .await;
            self.deliver(
                peer_id,
                ServerMessage::AddPeer {
                    peer_id: member,
                    create_offer: true,
                },
            )
            .await;
        }

        info!("Peer {} joined room {}", peer_id, room);

        self.share_rooms().await;
    }

    /// Shared by explicit LEAVE and the disconnect hook. Membership is the
    /// dedup key: a second call finds no rooms and sends nothing.
    async fn leave_rooms(&mut self, peer_id: PeerId) {
        let rooms = self.registry.rooms_of(&peer_id);
        if rooms.is_empty() {
            debug!("Peer {} is not in any room", peer_id);
            return;
        }

        for room in rooms {
            let remaining: Vec<PeerId> = self
                .registry
                .members_of(&room)
                .into_iter()
                .filter(|member| *member != peer_id)
                .collect();

            for member in remaining {
                self.deliver(member, ServerMessage::RemovePeer { peer_id })
                    .await;
                self.deliver(peer_id, ServerMessage::RemovePeer { peer_id: member })
                    .await;
            }

            self.registry.leave(&peer_id, &room);
            info!("Peer {} left room {}", peer_id, room);
        }

        self.share_rooms().await;
    }

    async fn forward(&self, from: PeerId, target: PeerId, msg: ServerMessage) {
        if !self.live.contains(&target) {
            debug!("Dropping relay from {} to departed peer {}", from, target);
            return;
        }
        self.signaling.send_signal(target, msg).await;
    }

    async fn deliver(&self, peer_id: PeerId, msg: ServerMessage) {
        if !self.live.contains(&peer_id) {
            debug!("Skipping {:?} for offline peer {}", msg, peer_id);
            return;
        }
        self.signaling.send_signal(peer_id, msg).await;
    }

    async fn share_rooms(&self) {
        let rooms = self.registry.list_rooms();
        self.signaling
            .broadcast(ServerMessage::ShareRooms { rooms })
            .await;
    }
}
