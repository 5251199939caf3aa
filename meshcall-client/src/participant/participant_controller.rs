use crate::capture::{LocalStream, MediaCapture, MediaConstraints};
use crate::channel::{ChannelEvent, SignalSink};
use crate::engine::{EngineEvent, MediaEngine};
use crate::error::ClientError;
use crate::participant::{
    ParticipantCommand, ParticipantConfig, ParticipantHandle, ParticipantSnapshot, Roster,
};
use crate::peer::{Epoch, EpochGuard, PeerSession, PeerState};
use meshcall_core::{ClientMessage, IceServerConfig, PeerId, RoomId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Local side of a call: media capture, one [`PeerSession`] per remote peer,
/// and the roster of peers whose media is flowing.
pub struct ParticipantController<E, C>
where
    E: MediaEngine,
    C: MediaCapture<Track = E::Track>,
{
    pub(super) engine: E,
    capture: C,
    pub(super) sink: Arc<dyn SignalSink>,
    constraints: MediaConstraints,
    pub(super) ice_servers: Vec<IceServerConfig>,

    epoch: Epoch,
    /// Guard of the current room visit; every session gets a clone.
    pub(super) visit: Option<EpochGuard>,
    pub(super) local_id: Option<PeerId>,
    pub(super) room: Option<RoomId>,
    pub(super) local_stream: Option<LocalStream<E::Track>>,
    pub(super) peers: HashMap<PeerId, PeerSession<E::Connection>>,
    pub(super) roster: Roster,
    pub(super) available_rooms: Vec<RoomId>,

    pub(super) engine_tx: mpsc::UnboundedSender<EngineEvent>,
    engine_rx: Option<mpsc::UnboundedReceiver<EngineEvent>>,
}

impl<E, C> ParticipantController<E, C>
where
    E: MediaEngine,
    C: MediaCapture<Track = E::Track>,
{
    pub fn new(engine: E, capture: C, sink: Arc<dyn SignalSink>, config: ParticipantConfig) -> Self {
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();

        Self {
            engine,
            capture,
            sink,
            constraints: config.constraints,
            ice_servers: config.ice_servers,
            epoch: Epoch::new(),
            visit: None,
            local_id: None,
            room: None,
            local_stream: None,
            peers: HashMap::new(),
            roster: Roster::new(),
            available_rooms: Vec::new(),
            engine_tx,
            engine_rx: Some(engine_rx),
        }
    }

    pub fn handle(&self) -> (ParticipantHandle, mpsc::UnboundedReceiver<ParticipantCommand>) {
        ParticipantHandle::channel(self.epoch.clone())
    }

    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn local_id(&self) -> Option<PeerId> {
        self.local_id
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn available_rooms(&self) -> &[RoomId] {
        &self.available_rooms
    }

    pub fn ice_servers(&self) -> &[IceServerConfig] {
        &self.ice_servers
    }

    pub fn local_stream(&self) -> Option<&LocalStream<E::Track>> {
        self.local_stream.as_ref()
    }

    /// `None` once the session is closed and forgotten.
    pub fn peer_state(&self, peer_id: &PeerId) -> Option<PeerState> {
        self.peers.get(peer_id).map(|session| session.state())
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn snapshot(&self) -> ParticipantSnapshot {
        let mut peers: Vec<(PeerId, PeerState)> = self
            .peers
            .iter()
            .map(|(peer_id, session)| (*peer_id, session.state()))
            .collect();
        peers.sort_by_key(|(peer_id, _)| *peer_id);

        ParticipantSnapshot {
            local_id: self.local_id,
            room: self.room.clone(),
            roster: self.roster.entries().to_vec(),
            peers,
            available_rooms: self.available_rooms.clone(),
        }
    }

    /// Acquires media, shows the local tile, then sends JOIN. A capture
    /// failure leaves everything untouched and nothing is sent.
    pub async fn enter_room(&mut self, room: RoomId) -> Result<(), ClientError> {
        if let Some(current) = &self.room {
            return Err(ClientError::AlreadyInRoom(current.clone()));
        }

        let guard = self.epoch.guard();
        info!("Entering room {}", room);

        let stream = self.capture.acquire(&self.constraints).await?;
        if !guard.is_current() {
            stream.stop();
            return Err(ClientError::Cancelled);
        }

        self.local_stream = Some(stream);
        self.roster.add_local();
        self.room = Some(room.clone());
        self.visit = Some(guard);

        if let Err(e) = self.sink.send(ClientMessage::Join { room }) {
            // Re-sent when the channel reports Connected
            warn!("JOIN not sent: {}", e);
        }
        Ok(())
    }

    /// Stops capture, closes every session and sends LEAVE. Safe to call
    /// when not in a room.
    pub async fn leave_room(&mut self) {
        self.epoch.advance();
        self.visit = None;

        if let Some(stream) = self.local_stream.take() {
            stream.stop();
        }
        self.close_all_sessions().await;
        self.roster.clear();

        if let Some(room) = self.room.take() {
            info!("Left room {}", room);
            if let Err(e) = self.sink.send(ClientMessage::Leave) {
                debug!("LEAVE not sent: {}", e);
            }
        }
    }

    pub(super) fn active_visit(&self) -> Option<EpochGuard> {
        self.visit.clone().filter(EpochGuard::is_current)
    }

    pub(super) async fn close_peer(&mut self, peer_id: &PeerId) {
        let Some(mut session) = self.peers.remove(peer_id) else {
            debug!("No session with {} to close", peer_id);
            return;
        };
        session.close().await;
        self.roster.remove(peer_id);
        info!("Peer {} removed", peer_id);
    }

    pub(super) async fn close_all_sessions(&mut self) {
        let sessions: Vec<_> = self.peers.drain().map(|(_, session)| session).collect();
        for mut session in sessions {
            session.close().await;
        }
        self.roster.retain_local();
    }

    /// Handles every engine event queued so far. For driving the controller
    /// without [`run`](Self::run).
    pub async fn pump_engine_events(&mut self) -> usize {
        let Some(mut engine_rx) = self.engine_rx.take() else {
            return 0;
        };

        let mut handled = 0;
        while let Ok(event) = engine_rx.try_recv() {
            self.handle_engine_event(event).await;
            handled += 1;
        }

        self.engine_rx = Some(engine_rx);
        handled
    }

    pub async fn run(
        mut self,
        mut channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
        mut commands: mpsc::UnboundedReceiver<ParticipantCommand>,
    ) {
        let Some(mut engine_rx) = self.engine_rx.take() else {
            error!("Participant loop is already running");
            return;
        };
        info!("Participant loop started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(ParticipantCommand::Enter { room, reply }) => {
                        let result = self.enter_room(room).await;
                        let _ = reply.send(result);
                    }
                    Some(ParticipantCommand::Leave) => self.leave_room().await,
                    Some(ParticipantCommand::Snapshot { reply }) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(ParticipantCommand::Shutdown) | None => {
                        self.leave_room().await;
                        break;
                    }
                },

                event = channel_events.recv() => match event {
                    Some(event) => self.handle_channel_event(event).await,
                    None => {
                        self.leave_room().await;
                        break;
                    }
                },

                Some(event) = engine_rx.recv() => self.handle_engine_event(event).await,
            }
        }

        info!("Participant loop finished");
    }
}
