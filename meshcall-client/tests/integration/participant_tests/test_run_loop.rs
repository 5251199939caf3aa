use meshcall_client::{ChannelEvent, ClientError, MediaKind, PeerState, RosterEntry};
use meshcall_core::{PeerId, RoomId, ServerMessage};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::integration::{ROOM_ID, create_controller, init_tracing};
use crate::utils::{FakeCapture, FakeEngine};

#[tokio::test]
async fn test_run_loop_via_handle() {
    init_tracing();

    let engine = FakeEngine::new();
    let capture = FakeCapture::default();
    let (controller, sink) = create_controller(engine.clone(), capture.clone());
    let (handle, commands) = controller.handle();
    let (channel_tx, channel_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(controller.run(channel_rx, commands));

    handle.enter(RoomId::from(ROOM_ID)).await.unwrap();
    assert!(matches!(
        handle.enter(RoomId::from(ROOM_ID)).await,
        Err(ClientError::AlreadyInRoom(_))
    ));

    let peer = PeerId::new();
    channel_tx
        .send(ChannelEvent::Message(ServerMessage::AddPeer {
            peer_id: peer,
            create_offer: true,
        }))
        .unwrap();

    // Commands and channel events share one loop; poll until it caught up
    let snapshot = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = handle.snapshot().await.unwrap();
            if !snapshot.peers.is_empty() {
                return snapshot;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert_eq!(snapshot.peers, vec![(peer, PeerState::Negotiating)]);
    assert_eq!(snapshot.roster, vec![RosterEntry::Local]);

    engine.probe_for(&peer).emit_remote_track(MediaKind::Video);
    let snapshot = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = handle.snapshot().await.unwrap();
            if snapshot.roster.len() == 2 {
                return snapshot;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert_eq!(snapshot.peers, vec![(peer, PeerState::Connected)]);

    handle.shutdown().unwrap();
    task.await.unwrap();

    assert!(engine.all_closed());
    assert!(capture.all_tracks_stopped());
    assert_eq!(sink.count_joins(), 1);
    assert!(matches!(
        handle.snapshot().await,
        Err(ClientError::ControllerStopped)
    ));
}
