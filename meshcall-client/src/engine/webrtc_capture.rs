use crate::capture::{LocalStream, MediaCapture, MediaConstraints, MediaKind, MediaTrack};
use crate::error::CaptureError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

const OPUS_CLOCK_RATE: u32 = 48_000;
const VIDEO_CLOCK_RATE: u32 = 90_000;

/// Local track the application feeds with already encoded samples.
#[derive(Clone)]
pub struct WebRtcTrack {
    id: String,
    kind: MediaKind,
    local: Arc<TrackLocalStaticSample>,
    stopped: Arc<AtomicBool>,
}

impl WebRtcTrack {
    fn new(kind: MediaKind, stream_id: &str) -> Self {
        let (id, capability) = match kind {
            MediaKind::Audio => (
                format!("audio-{}", stream_id),
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: OPUS_CLOCK_RATE,
                    channels: 2,
                    ..Default::default()
                },
            ),
            MediaKind::Video => (
                format!("video-{}", stream_id),
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    clock_rate: VIDEO_CLOCK_RATE,
                    ..Default::default()
                },
            ),
        };

        let local = Arc::new(TrackLocalStaticSample::new(
            capability,
            id.clone(),
            stream_id.to_owned(),
        ));

        Self {
            id,
            kind,
            local,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn local(&self) -> Arc<TrackLocalStaticSample> {
        Arc::clone(&self.local)
    }

    /// Pushes one encoded frame to every connection the track was added to.
    pub async fn write_sample(&self, data: Bytes, duration: Duration) -> Result<(), CaptureError> {
        if self.is_stopped() {
            return Err(CaptureError::TrackStopped(self.id.clone()));
        }

        self.local
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await?;
        Ok(())
    }
}

impl MediaTrack for WebRtcTrack {
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

/// Hands out Opus and VP8 sample tracks. There is no device access here;
/// frames come from whatever the application writes.
#[derive(Debug, Clone, Default)]
pub struct WebRtcCapture;

#[async_trait]
impl MediaCapture for WebRtcCapture {
    type Track = WebRtcTrack;

    async fn acquire(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<WebRtcTrack>, CaptureError> {
        if !constraints.audio && !constraints.video {
            return Err(CaptureError::NothingRequested);
        }

        let stream_id = Uuid::new_v4().to_string();
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(WebRtcTrack::new(MediaKind::Audio, &stream_id));
        }
        if constraints.video {
            tracks.push(WebRtcTrack::new(MediaKind::Video, &stream_id));
        }

        info!("Acquired local stream {} with {} tracks", stream_id, tracks.len());
        Ok(LocalStream::new(stream_id, tracks))
    }
}
