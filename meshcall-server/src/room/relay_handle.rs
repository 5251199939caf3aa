use crate::error::RelayError;
use crate::room::RelayCommand;
use meshcall_core::{ClientMessage, PeerId, RoomId};
use tokio::sync::{mpsc, oneshot};

/// Clonable sending side of the coordinator's command queue.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<RelayCommand>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn connected(&self, peer_id: PeerId) -> Result<(), RelayError> {
        self.send(RelayCommand::Connected { peer_id }).await
    }

    pub async fn message(&self, peer_id: PeerId, message: ClientMessage) -> Result<(), RelayError> {
        self.send(RelayCommand::Message { peer_id, message }).await
    }

    pub async fn disconnecting(&self, peer_id: PeerId) -> Result<(), RelayError> {
        self.send(RelayCommand::Disconnecting { peer_id }).await
    }

    pub async fn list_rooms(&self) -> Result<Vec<RoomId>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::ListRooms { reply }).await?;
        rx.await.map_err(|_| RelayError::RelayClosed)
    }

    pub async fn send(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.tx.send(cmd).await.map_err(|_| RelayError::RelayClosed)
    }
}
