use crate::capture::MediaKind;
use meshcall_core::{IceCandidate, PeerId};

/// Remote media as announced by the engine. One event per inbound track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStream {
    pub stream_id: String,
    pub track_id: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CandidateGenerated {
        peer_id: PeerId,
        candidate: IceCandidate,
    },
    RemoteStream {
        peer_id: PeerId,
        stream: RemoteStream,
    },
}
