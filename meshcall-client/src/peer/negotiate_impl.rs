use crate::engine::PeerConnection;
use crate::error::ClientError;
use crate::peer::{PeerSession, PeerState, Role};
use meshcall_core::{ClientMessage, SessionDescription};
use tracing::{debug, info};

impl<P: PeerConnection> PeerSession<P> {
    /// Leaves `Announced`. The offerer produces, applies and relays its offer;
    /// the answerer just waits for one.
    pub async fn negotiate(&mut self) -> Result<(), ClientError> {
        if self.state != PeerState::Announced {
            return Ok(());
        }
        self.guard.check()?;
        self.state = PeerState::Negotiating;

        if self.role == Role::Answerer {
            debug!("Waiting for an offer from {}", self.peer_id);
            return Ok(());
        }

        let offer = self.connection.create_offer().await?;
        self.guard.check()?;

        self.connection.set_local_description(offer.clone()).await?;
        self.guard.check()?;

        info!("Sending offer to {}", self.peer_id);
        self.send_description(offer)
    }

    pub(super) fn send_description(&self, desc: SessionDescription) -> Result<(), ClientError> {
        self.sink.send(ClientMessage::RelaySdp {
            peer_id: self.peer_id,
            session_description: desc,
        })?;
        Ok(())
    }
}
