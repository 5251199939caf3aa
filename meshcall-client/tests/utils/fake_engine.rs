use async_trait::async_trait;
use meshcall_client::{
    CaptureError, EngineError, EngineEvent, LocalStream, MediaCapture, MediaConstraints,
    MediaEngine, MediaKind, MediaTrack, PeerConnection, RemoteStream,
};
use meshcall_core::{IceCandidate, IceServerConfig, PeerId, SessionDescription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, mpsc};

#[derive(Clone)]
pub struct FakeTrack {
    id: String,
    kind: MediaKind,
    stopped: Arc<AtomicBool>,
}

impl MediaTrack for FakeTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Capture that either hands out fake tracks or fails like a denied camera.
#[derive(Clone, Default)]
pub struct FakeCapture {
    deny: Arc<AtomicBool>,
    acquired: Arc<Mutex<Vec<LocalStream<FakeTrack>>>>,
}

impl FakeCapture {
    pub fn denied() -> Self {
        let capture = Self::default();
        capture.deny.store(true, Ordering::SeqCst);
        capture
    }

    pub fn acquired(&self) -> Vec<LocalStream<FakeTrack>> {
        self.acquired.lock().unwrap().clone()
    }

    pub fn all_tracks_stopped(&self) -> bool {
        self.acquired()
            .iter()
            .flat_map(|stream| stream.tracks().to_vec())
            .all(|track| track.is_stopped())
    }
}

#[async_trait]
impl MediaCapture for FakeCapture {
    type Track = FakeTrack;

    async fn acquire(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<FakeTrack>, CaptureError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(CaptureError::Unavailable("permission denied".into()));
        }

        let mut tracks = Vec::new();
        for (wanted, kind) in [
            (constraints.audio, MediaKind::Audio),
            (constraints.video, MediaKind::Video),
        ] {
            if wanted {
                tracks.push(FakeTrack {
                    id: format!("{:?}-track", kind),
                    kind,
                    stopped: Arc::new(AtomicBool::new(false)),
                });
            }
        }

        let stream = LocalStream::new("local", tracks);
        self.acquired.lock().unwrap().push(stream.clone());
        Ok(stream)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    AddLocalStream(usize),
    CreateOffer,
    CreateAnswer,
    SetLocal(SessionDescription),
    SetRemote(SessionDescription),
    AddCandidate(IceCandidate),
    Close,
}

/// What a test can see of one fake connection.
pub struct ConnectionProbe {
    pub peer_id: PeerId,
    calls: Mutex<Vec<EngineCall>>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl ConnectionProbe {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.calls().contains(&EngineCall::Close)
    }

    pub fn close_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == EngineCall::Close)
            .count()
    }

    pub fn emit_candidate(&self, candidate: IceCandidate) {
        let _ = self.events.send(EngineEvent::CandidateGenerated {
            peer_id: self.peer_id,
            candidate,
        });
    }

    pub fn emit_remote_track(&self, kind: MediaKind) {
        let _ = self.events.send(EngineEvent::RemoteStream {
            peer_id: self.peer_id,
            stream: RemoteStream {
                stream_id: format!("stream-{}", self.peer_id),
                track_id: format!("{:?}", kind),
                kind,
            },
        });
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

pub struct FakeConnection {
    probe: Arc<ConnectionProbe>,
    gate: Option<Arc<Notify>>,
}

impl FakeConnection {
    pub fn new(peer_id: PeerId) -> (Self, Arc<ConnectionProbe>) {
        let (events, _) = mpsc::unbounded_channel();
        Self::with_events(peer_id, events, None)
    }

    /// Offer and answer production block until `gate` is notified.
    pub fn gated(peer_id: PeerId, gate: Arc<Notify>) -> (Self, Arc<ConnectionProbe>) {
        let (events, _) = mpsc::unbounded_channel();
        Self::with_events(peer_id, events, Some(gate))
    }

    fn with_events(
        peer_id: PeerId,
        events: mpsc::UnboundedSender<EngineEvent>,
        gate: Option<Arc<Notify>>,
    ) -> (Self, Arc<ConnectionProbe>) {
        let probe = Arc::new(ConnectionProbe {
            peer_id,
            calls: Mutex::new(Vec::new()),
            events,
        });
        (
            Self {
                probe: probe.clone(),
                gate,
            },
            probe,
        )
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl PeerConnection for FakeConnection {
    type Track = FakeTrack;

    async fn add_local_stream(&self, stream: &LocalStream<FakeTrack>) -> Result<(), EngineError> {
        self.probe
            .record(EngineCall::AddLocalStream(stream.tracks().len()));
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        self.probe.record(EngineCall::CreateOffer);
        self.wait_gate().await;
        Ok(SessionDescription::offer(format!("offer-to-{}", self.probe.peer_id)))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        self.probe.record(EngineCall::CreateAnswer);
        self.wait_gate().await;
        Ok(SessionDescription::answer(format!("answer-to-{}", self.probe.peer_id)))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.probe.record(EngineCall::SetLocal(desc));
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.probe.record(EngineCall::SetRemote(desc));
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError> {
        self.probe.record(EngineCall::AddCandidate(candidate));
        Ok(())
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.probe.record(EngineCall::Close);
        Ok(())
    }
}

/// Engine handing out [`FakeConnection`]s and remembering every one.
#[derive(Clone, Default)]
pub struct FakeEngine {
    probes: Arc<Mutex<Vec<Arc<ConnectionProbe>>>>,
    ice_servers_seen: Arc<Mutex<Vec<Vec<IceServerConfig>>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let engine = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (engine, gate)
    }

    pub fn created(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    pub fn probes_for(&self, peer_id: &PeerId) -> Vec<Arc<ConnectionProbe>> {
        self.probes
            .lock()
            .unwrap()
            .iter()
            .filter(|probe| probe.peer_id == *peer_id)
            .cloned()
            .collect()
    }

    pub fn probe_for(&self, peer_id: &PeerId) -> Arc<ConnectionProbe> {
        self.probes_for(peer_id)
            .pop()
            .expect("No connection created for peer")
    }

    pub fn all_closed(&self) -> bool {
        self.probes.lock().unwrap().iter().all(|probe| probe.is_closed())
    }

    pub fn last_ice_servers(&self) -> Option<Vec<IceServerConfig>> {
        self.ice_servers_seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    type Track = FakeTrack;
    type Connection = FakeConnection;

    async fn create_connection(
        &self,
        peer_id: PeerId,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<FakeConnection, EngineError> {
        self.ice_servers_seen
            .lock()
            .unwrap()
            .push(ice_servers.to_vec());

        let (connection, probe) = FakeConnection::with_events(peer_id, events, self.gate.clone());
        self.probes.lock().unwrap().push(probe);
        Ok(connection)
    }
}
