mod channel_config;
mod relay_client;

pub use channel_config::ChannelConfig;
pub use relay_client::RelayClient;

use crate::error::ChannelError;
use meshcall_core::{ClientMessage, ServerMessage};

/// Исходящая сторона сигнального канала.
pub trait SignalSink: Send + Sync {
    /// Fire-and-forget. Fails only if there is no open connection right now.
    fn send(&self, message: ClientMessage) -> Result<(), ChannelError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A socket is open. Emitted again after every successful reconnect.
    Connected,
    Message(ServerMessage),
    Disconnected,
    /// Reconnection attempts are exhausted; no further events follow.
    GaveUp,
}
