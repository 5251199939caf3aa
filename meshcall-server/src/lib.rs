mod config;
mod error;
mod room;
mod signaling;

pub use config::*;
pub use error::*;
pub use room::*;
pub use signaling::*;

use meshcall_core::IceServerConfig;
use std::sync::Arc;

/// Wires a coordinator to a fresh signaling service and starts its event loop.
pub fn spawn_relay(ice_servers: Vec<IceServerConfig>, command_buffer: usize) -> SignalingService {
    let (relay, command_rx) = RelayHandle::channel(command_buffer);
    let service = SignalingService::new(relay);

    let coordinator = RelayCoordinator::new(command_rx, Arc::new(service.clone()), ice_servers);
    tokio::spawn(coordinator.run());

    service
}
