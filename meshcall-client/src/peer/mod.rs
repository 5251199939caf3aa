mod epoch;
mod handle_remote_impl;
mod negotiate_impl;
mod peer_session;

pub use epoch::{Epoch, EpochGuard};
pub use peer_session::PeerSession;

/// Жизненный цикл соединения с одним удаленным участником.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Announced,
    Negotiating,
    /// Remote media has arrived.
    Connected,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Offerer,
    Answerer,
}

impl Role {
    pub fn from_create_offer(create_offer: bool) -> Self {
        if create_offer {
            Role::Offerer
        } else {
            Role::Answerer
        }
    }
}
