use crate::error::ClientError;
use crate::participant::{ParticipantCommand, ParticipantSnapshot};
use crate::peer::Epoch;
use meshcall_core::RoomId;
use tokio::sync::{mpsc, oneshot};

/// Clonable front of a running [`ParticipantController`](crate::ParticipantController).
#[derive(Clone)]
pub struct ParticipantHandle {
    tx: mpsc::UnboundedSender<ParticipantCommand>,
    epoch: Epoch,
}

impl ParticipantHandle {
    pub fn channel(epoch: Epoch) -> (Self, mpsc::UnboundedReceiver<ParticipantCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, epoch }, rx)
    }

    pub async fn enter(&self, room: RoomId) -> Result<(), ClientError> {
        let (reply, rx) = oneshot::channel();
        self.send(ParticipantCommand::Enter { room, reply })?;
        rx.await.map_err(|_| ClientError::ControllerStopped)?
    }

    /// Work in flight for the current room is invalidated before this
    /// returns; the controller finishes the teardown on its own loop.
    pub fn leave(&self) -> Result<(), ClientError> {
        self.epoch.advance();
        self.send(ParticipantCommand::Leave)
    }

    pub async fn snapshot(&self) -> Result<ParticipantSnapshot, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.send(ParticipantCommand::Snapshot { reply })?;
        rx.await.map_err(|_| ClientError::ControllerStopped)
    }

    pub fn shutdown(&self) -> Result<(), ClientError> {
        self.epoch.advance();
        self.send(ParticipantCommand::Shutdown)
    }

    fn send(&self, command: ParticipantCommand) -> Result<(), ClientError> {
        self.tx
            .send(command)
            .map_err(|_| ClientError::ControllerStopped)
    }
}
