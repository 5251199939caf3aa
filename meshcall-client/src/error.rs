use meshcall_core::RoomId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("media capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("media engine failed: {0}")]
    Engine(#[from] EngineError),

    #[error("signaling channel failed: {0}")]
    Channel(#[from] ChannelError),

    /// The room visit this work belonged to has ended.
    #[error("operation cancelled by teardown")]
    Cancelled,

    #[error("already in room {0}")]
    AlreadyInRoom(RoomId),

    #[error("participant controller stopped")]
    ControllerStopped,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    WebRtc(#[from] webrtc::Error),

    #[error("session description has no type")]
    MissingType,

    #[error("session description has no sdp")]
    MissingSdp,

    #[error("connection is closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio or video requested")]
    NothingRequested,

    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    #[error("track {0} is stopped")]
    TrackStopped(String),

    #[error(transparent)]
    WebRtc(#[from] webrtc::Error),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("not connected to the relay")]
    Disconnected,

    #[error("relay client is shut down")]
    Closed,

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
