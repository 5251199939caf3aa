use async_trait::async_trait;
use meshcall_core::{PeerId, ServerMessage};

/// Трейт, который должна реализовать внешняя система (WebSocket сервер),
/// чтобы координатор мог отправлять сообщения клиентам.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Отправить сообщение конкретному пользователю.
    async fn send_signal(&self, peer_id: PeerId, msg: ServerMessage);

    /// Разослать сообщение всем подключенным пользователям.
    async fn broadcast(&self, msg: ServerMessage);
}
