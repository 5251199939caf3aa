use crate::engine::PeerConnection;
use crate::error::ClientError;
use crate::peer::{PeerSession, PeerState};
use meshcall_core::{IceCandidate, SdpType, SessionDescription};
use tracing::{debug, info};

impl<P: PeerConnection> PeerSession<P> {
    /// Applies a relayed description. An offer is answered; anything else
    /// ends this side's part of the exchange.
    pub async fn on_remote_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<(), ClientError> {
        if !self.is_open() {
            debug!("Dropping description from {}: session closed", self.peer_id);
            return Ok(());
        }
        self.guard.check()?;
        if self.state == PeerState::Announced {
            self.state = PeerState::Negotiating;
        }

        let kind = desc.kind;
        self.connection.set_remote_description(desc).await?;
        self.guard.check()?;

        match kind {
            Some(SdpType::Offer) => {
                let answer = self.connection.create_answer().await?;
                self.guard.check()?;

                self.connection.set_local_description(answer.clone()).await?;
                self.guard.check()?;

                info!("Sending answer to {}", self.peer_id);
                self.send_description(answer)
            }
            Some(SdpType::Answer) => {
                debug!("Answer from {} applied", self.peer_id);
                Ok(())
            }
            Some(SdpType::Rollback) | None => {
                debug!("Applied {:?} description from {}", kind, self.peer_id);
                Ok(())
            }
        }
    }

    /// Hands a remote candidate to the engine as is.
    pub async fn on_remote_candidate(&mut self, candidate: IceCandidate) -> Result<(), ClientError> {
        match self.state {
            PeerState::Closed => {
                debug!("Dropping candidate from {}: session closed", self.peer_id);
                return Ok(());
            }
            PeerState::Announced => {
                debug!("Dropping candidate from {}: not negotiating", self.peer_id);
                return Ok(());
            }
            PeerState::Negotiating | PeerState::Connected => {}
        }
        self.guard.check()?;

        self.connection.add_ice_candidate(candidate).await?;
        Ok(())
    }
}
