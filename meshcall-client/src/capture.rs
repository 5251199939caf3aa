use crate::error::CaptureError;
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// A locally captured track. Clones share the same underlying source.
pub trait MediaTrack: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn kind(&self) -> MediaKind;
    /// Stops the source. Calling it again has no effect.
    fn stop(&self);
    fn is_stopped(&self) -> bool;
}

/// Local media acquired for one room visit.
#[derive(Debug, Clone)]
pub struct LocalStream<T> {
    id: String,
    tracks: Vec<T>,
}

impl<T: MediaTrack> LocalStream<T> {
    pub fn new(id: impl Into<String>, tracks: Vec<T>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[T] {
        &self.tracks
    }

    pub fn stop(&self) {
        for track in &self.tracks {
            if !track.is_stopped() {
                debug!("Stopping local {:?} track {}", track.kind(), track.id());
                track.stop();
            }
        }
    }
}

/// Локальный захват медиа (камера, микрофон).
#[async_trait]
pub trait MediaCapture: Send + Sync + 'static {
    type Track: MediaTrack;

    async fn acquire(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<Self::Track>, CaptureError>;
}
