use parley_core::{ConnectionId, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{drain, flush, join, next_delivery};

#[tokio::test]
async fn test_first_peer_joins_silently() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, _signaling) = create_test_relay(false);
    let a = ConnectionId::new();

    join(&room_cmd_tx, a, "abc123").await.unwrap();
    let stats = flush(&room_cmd_tx).await.unwrap();

    assert_eq!(stats.rooms, 1);
    assert_eq!(stats.members, 1);
    assert!(drain(&mut signal_rx).is_empty(), "nobody to notify yet");
}

#[tokio::test]
async fn test_second_peer_is_announced_to_first() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, signaling) = create_test_relay(false);
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    join(&room_cmd_tx, a, "abc123").await.unwrap();
    join(&room_cmd_tx, b, "abc123").await.unwrap();

    let delivered = next_delivery(&mut signal_rx).await.unwrap();
    assert_eq!(delivered.peer_id, a);
    assert_eq!(delivered.message, ServerMessage::UserJoined(b));

    let stats = flush(&room_cmd_tx).await.unwrap();
    assert_eq!(stats.members, 2);
    assert!(signaling.delivered_to(&b).await.is_empty());
}

#[tokio::test]
async fn test_rejoin_announces_again() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, _signaling) = create_test_relay(false);
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    join(&room_cmd_tx, a, "r").await.unwrap();
    join(&room_cmd_tx, b, "r").await.unwrap();
    join(&room_cmd_tx, b, "r").await.unwrap();
    let stats = flush(&room_cmd_tx).await.unwrap();

    let delivered = drain(&mut signal_rx);
    assert_eq!(delivered.len(), 2);
    assert!(delivered.iter().all(|d| d.peer_id == a));
    assert_eq!(stats.members, 2, "membership is a set");
}
