use crate::error::RelayError;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use meshcall_core::IceServerConfig;
use meshcall_core::utils::DEFAULT_STUN_ADDR;
use std::net::{IpAddr, SocketAddr};
use tower_http::cors::{Any, CorsLayer};

/// Relay process settings. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "meshcall-relay", version, about = "Signaling relay for full-mesh calls")]
pub struct RelayConfig {
    #[arg(long, env = "MESHCALL_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Origin allowed to open the socket from a browser, or `*`.
    #[arg(long, env = "MESHCALL_CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// STUN server URLs announced to clients in the welcome message.
    #[arg(
        long = "ice-server",
        env = "MESHCALL_ICE_SERVERS",
        value_delimiter = ',',
        default_value = DEFAULT_STUN_ADDR
    )]
    pub ice_servers: Vec<String>,

    /// Capacity of the coordinator's command queue.
    #[arg(long, default_value_t = 256)]
    pub command_buffer: usize,
}

impl RelayConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        if self.ice_servers.is_empty() {
            return Vec::new();
        }

        vec![IceServerConfig {
            urls: self.ice_servers.clone(),
            username: None,
            credential: None,
        }]
    }

    pub fn cors_layer(&self) -> Result<CorsLayer, RelayError> {
        let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST]);

        if self.cors_origin == "*" {
            return Ok(layer.allow_origin(Any));
        }

        let origin = HeaderValue::from_str(&self.cors_origin)
            .map_err(|_| RelayError::InvalidOrigin(self.cors_origin.clone()))?;
        Ok(layer.allow_origin(origin))
    }
}
