use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay coordinator is not running")]
    RelayClosed,

    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped with an I/O error")]
    Serve(#[from] std::io::Error),
}
