use crate::error::ClientError;
use crate::participant::RosterEntry;
use crate::peer::PeerState;
use meshcall_core::{PeerId, RoomId};
use tokio::sync::oneshot;

/// Команды, которые управляющий код отправляет контроллеру участника.
#[derive(Debug)]
pub enum ParticipantCommand {
    /// Захватить медиа и войти в комнату.
    Enter {
        room: RoomId,
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    /// Выйти из комнаты, закрыв все соединения.
    Leave,
    Snapshot {
        reply: oneshot::Sender<ParticipantSnapshot>,
    },
    /// Выйти и остановить цикл.
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantSnapshot {
    pub local_id: Option<PeerId>,
    pub room: Option<RoomId>,
    pub roster: Vec<RosterEntry>,
    pub peers: Vec<(PeerId, PeerState)>,
    pub available_rooms: Vec<RoomId>,
}
