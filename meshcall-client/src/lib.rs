pub mod capture;
pub mod channel;
pub mod engine;
mod error;
pub mod participant;
pub mod peer;

pub use capture::{LocalStream, MediaCapture, MediaConstraints, MediaKind, MediaTrack};
pub use channel::{ChannelConfig, ChannelEvent, RelayClient, SignalSink};
pub use engine::{
    EngineEvent, MediaEngine, PeerConnection, RemoteStream, WebRtcCapture, WebRtcConnection,
    WebRtcEngine, WebRtcTrack,
};
pub use error::*;
pub use participant::{
    ParticipantCommand, ParticipantConfig, ParticipantController, ParticipantHandle,
    ParticipantSnapshot, Roster, RosterEntry,
};
pub use peer::{Epoch, EpochGuard, PeerSession, PeerState, Role};
