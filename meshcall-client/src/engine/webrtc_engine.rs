use crate::capture::{LocalStream, MediaKind};
use crate::engine::{EngineEvent, MediaEngine, PeerConnection, RemoteStream, WebRtcTrack};
use crate::error::EngineError;
use async_trait::async_trait;
use meshcall_core::{IceCandidate, IceServerConfig, PeerId, SdpType, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine as CodecRegistry;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// [`MediaEngine`] backed by the `webrtc` crate. One API instance is shared
/// by every connection it creates.
#[derive(Clone)]
pub struct WebRtcEngine {
    api: Arc<API>,
}

impl WebRtcEngine {
    pub fn new() -> Result<Self, EngineError> {
        let mut codecs = CodecRegistry::default();
        codecs.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut codecs)?;

        let api = APIBuilder::new()
            .with_media_engine(codecs)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self { api: Arc::new(api) })
    }
}

#[async_trait]
impl MediaEngine for WebRtcEngine {
    type Track = WebRtcTrack;
    type Connection = WebRtcConnection;

    async fn create_connection(
        &self,
        peer_id: PeerId,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<WebRtcConnection, EngineError> {
        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(self.api.new_peer_connection(rtc_config).await?);

        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                Box::pin(async move {
                    debug!("Peer connection to {} is {:?}", peer_id, s);
                })
            },
        ));

        let ice_tx = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                // None marks the end of gathering
                let Some(candidate) = c else { return };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Failed to serialize local candidate for {}: {}", peer_id, e);
                        return;
                    }
                };
                let _ = tx.send(EngineEvent::CandidateGenerated {
                    peer_id,
                    candidate: IceCandidate {
                        candidate: Some(init.candidate),
                        sdp_mid: init.sdp_mid,
                        sdp_m_line_index: init.sdp_mline_index,
                        username_fragment: init.username_fragment,
                        ..Default::default()
                    },
                });
            })
        }));

        let track_tx = events;
        peer_connection.on_track(Box::new(move |track: Arc<TrackRemote>, _, _| {
            let tx = track_tx.clone();

            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => MediaKind::Audio,
                    _ => MediaKind::Video,
                };
                info!("Remote {:?} track from {}", kind, peer_id);
                let _ = tx.send(EngineEvent::RemoteStream {
                    peer_id,
                    stream: RemoteStream {
                        stream_id: track.stream_id(),
                        track_id: track.id(),
                        kind,
                    },
                });
            })
        }));

        Ok(WebRtcConnection {
            peer_id,
            peer_connection,
        })
    }
}

pub struct WebRtcConnection {
    peer_id: PeerId,
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcConnection {
    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, EngineError> {
    let kind = desc.kind.ok_or(EngineError::MissingType)?;

    match kind {
        SdpType::Offer => Ok(RTCSessionDescription::offer(
            desc.sdp.ok_or(EngineError::MissingSdp)?,
        )?),
        SdpType::Answer => Ok(RTCSessionDescription::answer(
            desc.sdp.ok_or(EngineError::MissingSdp)?,
        )?),
        SdpType::Rollback => {
            let mut rollback = RTCSessionDescription::default();
            rollback.sdp_type = RTCSdpType::Rollback;
            Ok(rollback)
        }
    }
}

fn from_rtc(desc: RTCSessionDescription) -> SessionDescription {
    let kind = match desc.sdp_type {
        RTCSdpType::Offer => Some(SdpType::Offer),
        RTCSdpType::Answer => Some(SdpType::Answer),
        RTCSdpType::Rollback => Some(SdpType::Rollback),
        _ => None,
    };

    SessionDescription {
        kind,
        sdp: Some(desc.sdp),
        ..Default::default()
    }
}

#[async_trait]
impl PeerConnection for WebRtcConnection {
    type Track = WebRtcTrack;

    async fn add_local_stream(&self, stream: &LocalStream<WebRtcTrack>) -> Result<(), EngineError> {
        for track in stream.tracks() {
            self.peer_connection
                .add_track(track.local() as Arc<dyn TrackLocal + Send + Sync>)
                .await?;
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(from_rtc(offer))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(from_rtc(answer))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.peer_connection
            .set_local_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.peer_connection
            .set_remote_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), EngineError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.unwrap_or_default(),
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
