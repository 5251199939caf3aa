use meshcall_core::{ClientMessage, IceCandidate, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{connect_peer, list_rooms, send};

fn candidate(port: u16) -> IceCandidate {
    IceCandidate {
        candidate: Some(format!(
            "candidate:{port} 1 udp 2122260223 192.168.1.7 {port} typ host"
        )),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
        username_fragment: Some("abcd".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_ice_candidate_exchange() {
    init_tracing();

    let (relay, signaling) = create_test_relay();

    let a = connect_peer(&relay).await.unwrap();
    let b = connect_peer(&relay).await.unwrap();
    list_rooms(&relay).await.unwrap();
    signaling.clear().await;

    for port in [50000, 50001, 50002] {
        send(
            &relay,
            a,
            ClientMessage::RelayIce {
                peer_id: b,
                ice_candidate: candidate(port),
            },
        )
        .await
        .unwrap();
    }
    list_rooms(&relay).await.unwrap();

    // Forwarded in order, with the sender substituted
    let received: Vec<_> = signaling
        .messages_for(&b)
        .await
        .into_iter()
        .map(|msg| match msg {
            ServerMessage::IceCandidate {
                peer_id,
                ice_candidate,
            } => {
                assert_eq!(peer_id, a);
                ice_candidate
            }
            other => panic!("Unexpected message: {:?}", other),
        })
        .collect();

    assert_eq!(
        received,
        vec![candidate(50000), candidate(50001), candidate(50002)]
    );
    assert!(signaling.messages_for(&a).await.is_empty());
}

#[tokio::test]
async fn test_empty_candidate_is_forwarded_verbatim() {
    init_tracing();

    let (relay, signaling) = create_test_relay();

    let a = connect_peer(&relay).await.unwrap();
    let b = connect_peer(&relay).await.unwrap();
    list_rooms(&relay).await.unwrap();
    signaling.clear().await;

    send(
        &relay,
        a,
        ClientMessage::RelayIce {
            peer_id: b,
            ice_candidate: IceCandidate::default(),
        },
    )
    .await
    .unwrap();
    list_rooms(&relay).await.unwrap();

    assert_eq!(
        signaling.messages_for(&b).await,
        vec![ServerMessage::IceCandidate {
            peer_id: a,
            ice_candidate: IceCandidate::default(),
        }]
    );
}
