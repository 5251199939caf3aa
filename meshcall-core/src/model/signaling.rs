use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Rollback,
}

/// SDP as the browser hands it out. The relay forwards it untouched, so
/// both fields stay optional and unknown keys ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SdpType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: Some(SdpType::Offer),
            sdp: Some(sdp.into()),
            extra: Map::new(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: Some(SdpType::Answer),
            sdp: Some(sdp.into()),
            extra: Map::new(),
        }
    }

    pub fn rollback() -> Self {
        Self {
            kind: Some(SdpType::Rollback),
            sdp: None,
            extra: Map::new(),
        }
    }
}

/// Absent fields stay absent on the way out: a browser reads a `null`
/// candidate as the string `"null"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Сообщения от клиента к сигнальному серверу.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    Join {
        room: RoomId,
    },
    Leave,
    GetRooms,
    RelaySdp {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
        #[serde(rename = "sessionDescription")]
        session_description: SessionDescription,
    },
    RelayIce {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
        #[serde(rename = "iceCandidate")]
        ice_candidate: IceCandidate,
    },
}

/// Сообщения от сигнального сервера к клиенту.
///
/// `peer_id` у `SessionDescription` и `IceCandidate` всегда указывает на отправителя.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
        #[serde(rename = "iceServers")]
        ice_servers: Vec<IceServerConfig>,
    },
    ShareRooms {
        rooms: Vec<RoomId>,
    },
    AddPeer {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
        #[serde(rename = "createOffer")]
        create_offer: bool,
    },
    RemovePeer {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
    },
    SessionDescription {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
        #[serde(rename = "sessionDescription")]
        session_description: SessionDescription,
    },
    IceCandidate {
        #[serde(rename = "peerID")]
        peer_id: PeerId,
        #[serde(rename = "iceCandidate")]
        ice_candidate: IceCandidate,
    },
}
