use meshcall_client::{ChannelEvent, MediaKind, RosterEntry};
use meshcall_core::{ClientMessage, PeerId, RoomId, ServerMessage};

use crate::integration::{ROOM_ID, create_controller, init_tracing};
use crate::utils::{FakeCapture, FakeEngine};

#[tokio::test]
async fn test_connected_requests_rooms() {
    init_tracing();

    let (mut controller, sink) = create_controller(FakeEngine::new(), FakeCapture::default());

    controller.handle_channel_event(ChannelEvent::Connected).await;

    assert_eq!(sink.sent(), vec![ClientMessage::GetRooms]);
}

#[tokio::test]
async fn test_disconnect_drops_sessions_but_keeps_media() {
    init_tracing();

    let engine = FakeEngine::new();
    let capture = FakeCapture::default();
    let (mut controller, sink) = create_controller(engine.clone(), capture.clone());
    controller.enter_room(RoomId::from(ROOM_ID)).await.unwrap();

    let peer = PeerId::new();
    controller
        .handle_channel_event(ChannelEvent::Message(ServerMessage::AddPeer {
            peer_id: peer,
            create_offer: false,
        }))
        .await;
    engine.probe_for(&peer).emit_remote_track(MediaKind::Audio);
    controller.pump_engine_events().await;

    controller
        .handle_channel_event(ChannelEvent::Disconnected)
        .await;

    assert!(engine.all_closed());
    assert_eq!(controller.peer_count(), 0);
    assert_eq!(controller.roster().entries(), &[RosterEntry::Local]);
    assert!(!capture.all_tracks_stopped());
    assert!(controller.local_id().is_none());

    // Back online: the relay forgot us, so ask again and rejoin
    sink.clear();
    controller.handle_channel_event(ChannelEvent::Connected).await;
    assert_eq!(
        sink.sent(),
        vec![
            ClientMessage::GetRooms,
            ClientMessage::Join {
                room: ROOM_ID.into()
            },
        ]
    );
}

#[tokio::test]
async fn test_join_sent_once_channel_comes_up() {
    init_tracing();

    let (mut controller, sink) = create_controller(FakeEngine::new(), FakeCapture::default());

    sink.set_offline(true);
    controller.enter_room(RoomId::from(ROOM_ID)).await.unwrap();
    assert!(sink.sent().is_empty());

    sink.set_offline(false);
    controller.handle_channel_event(ChannelEvent::Connected).await;
    assert_eq!(sink.count_joins(), 1);
}

#[tokio::test]
async fn test_gave_up_tears_down() {
    init_tracing();

    let engine = FakeEngine::new();
    let capture = FakeCapture::default();
    let (mut controller, sink) = create_controller(engine.clone(), capture.clone());
    controller.enter_room(RoomId::from(ROOM_ID)).await.unwrap();
    controller
        .handle_server_message(ServerMessage::AddPeer {
            peer_id: PeerId::new(),
            create_offer: true,
        })
        .await;

    sink.set_offline(true);
    controller.handle_channel_event(ChannelEvent::GaveUp).await;

    assert!(engine.all_closed());
    assert!(capture.all_tracks_stopped());
    assert!(controller.room().is_none());
    assert!(controller.roster().is_empty());
}
