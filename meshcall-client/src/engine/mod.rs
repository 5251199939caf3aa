mod engine_event;
mod webrtc_capture;
mod webrtc_engine;

pub use engine_event::{EngineEvent, RemoteStream};
pub use webrtc_capture::{WebRtcCapture, WebRtcTrack};
pub use webrtc_engine::{WebRtcConnection, WebRtcEngine};

use crate::capture::{LocalStream, MediaTrack};
use crate::error::EngineError;
use async_trait::async_trait;
use meshcall_core::{IceCandidate, IceServerConfig, PeerId, SessionDescription};
use tokio::sync::mpsc;

/// Одно медиа-соединение с удаленным участником.
///
/// Локальные ICE-кандидаты и входящие треки приходят как [`EngineEvent`]
/// в канал, переданный при создании.
#[async_trait]
pub trait PeerConnection: Send + Sync + 'static {
    type Track: MediaTrack;

    async fn add_local_stream(&self, stream: &LocalStream<Self::Track>)
    -> Result<(), EngineError>;

    async fn create_offer(&self) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    /// Ordering relative to the remote description is the engine's concern.
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError>;

    async fn close(&self) -> Result<(), EngineError>;
}

/// Фабрика медиа-соединений.
#[async_trait]
pub trait MediaEngine: Send + Sync + 'static {
    type Track: MediaTrack;
    type Connection: PeerConnection<Track = Self::Track>;

    async fn create_connection(
        &self,
        peer_id: PeerId,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<Self::Connection, EngineError>;
}
