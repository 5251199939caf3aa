use meshcall_core::{ClientMessage, PeerId, RoomId};
use tokio::sync::oneshot;

/// Команды, поступающие в координатор от сигнального сервера (WebSocket/HTTP).
#[derive(Debug)]
pub enum RelayCommand {
    /// Новое WebSocket соединение принято, исходящий канал уже зарегистрирован.
    Connected { peer_id: PeerId },

    /// Разобранное сообщение от клиента.
    Message {
        peer_id: PeerId,
        message: ClientMessage,
    },

    /// Соединение закрывается: неявный выход из всех комнат.
    Disconnecting { peer_id: PeerId },

    /// Снимок списка публичных комнат (для HTTP).
    ListRooms { reply: oneshot::Sender<Vec<RoomId>> },
}
