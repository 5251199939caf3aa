use meshcall_client::{Epoch, PeerSession, PeerState, Role};
use meshcall_core::{ClientMessage, IceCandidate, PeerId, SessionDescription};
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{EngineCall, FakeConnection, RecordingSink};

fn candidate(n: u16) -> IceCandidate {
    IceCandidate {
        candidate: Some(format!("candidate:{n} 1 udp 1 10.0.0.{n} 5000 typ host")),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_answerer_waits_then_answers() {
    init_tracing();

    let peer = PeerId::new();
    let sink = RecordingSink::new();
    let (connection, probe) = FakeConnection::new(peer);
    let mut session = PeerSession::new(
        peer,
        Role::Answerer,
        connection,
        Arc::new(sink.clone()),
        Epoch::new().guard(),
    );

    session.negotiate().await.unwrap();
    assert_eq!(session.state(), PeerState::Negotiating);
    assert!(sink.sent().is_empty());
    assert!(probe.calls().is_empty());

    let offer = SessionDescription::offer("v=0 remote offer");
    session.on_remote_description(offer.clone()).await.unwrap();

    let answer = SessionDescription::answer(format!("answer-to-{}", peer));
    assert_eq!(
        probe.calls(),
        vec![
            EngineCall::SetRemote(offer),
            EngineCall::CreateAnswer,
            EngineCall::SetLocal(answer.clone()),
        ]
    );
    assert_eq!(
        sink.sent(),
        vec![ClientMessage::RelaySdp {
            peer_id: peer,
            session_description: answer,
        }]
    );
}

#[tokio::test]
async fn test_candidates_pass_through_in_order() {
    init_tracing();

    let peer = PeerId::new();
    let sink = RecordingSink::new();
    let (connection, probe) = FakeConnection::new(peer);
    let mut session = PeerSession::new(
        peer,
        Role::Answerer,
        connection,
        Arc::new(sink.clone()),
        Epoch::new().guard(),
    );
    session.negotiate().await.unwrap();

    // Candidates may beat the offer; the engine gets them untouched
    session.on_remote_candidate(candidate(1)).await.unwrap();
    session
        .on_remote_description(SessionDescription::offer("v=0"))
        .await
        .unwrap();
    session.on_remote_candidate(candidate(2)).await.unwrap();

    let applied: Vec<_> = probe
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            EngineCall::AddCandidate(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(applied, vec![candidate(1), candidate(2)]);
    assert_eq!(probe.calls()[0], EngineCall::AddCandidate(candidate(1)));
}

#[tokio::test]
async fn test_rollback_is_applied_without_reply() {
    init_tracing();

    let peer = PeerId::new();
    let sink = RecordingSink::new();
    let (connection, probe) = FakeConnection::new(peer);
    let mut session = PeerSession::new(
        peer,
        Role::Answerer,
        connection,
        Arc::new(sink.clone()),
        Epoch::new().guard(),
    );
    session.negotiate().await.unwrap();

    session
        .on_remote_description(SessionDescription::rollback())
        .await
        .unwrap();

    assert_eq!(
        probe.calls(),
        vec![EngineCall::SetRemote(SessionDescription::rollback())]
    );
    assert!(sink.sent().is_empty());
}
