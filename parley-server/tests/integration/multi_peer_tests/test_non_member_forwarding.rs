use parley_core::{ClientMessage, ConnectionId, RoomId, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{drain, flush, join, payload, send_client};

/// Room ids are trusted as given: a sender outside the room still reaches
/// its members, but never receives anything from it.
#[tokio::test]
async fn test_outsider_can_send_but_never_receives() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, signaling) = create_test_relay(false);
    let (member, outsider) = (ConnectionId::new(), ConnectionId::new());

    join(&room_cmd_tx, member, "private").await.unwrap();
    send_client(
        &room_cmd_tx,
        outsider,
        ClientMessage::Offer {
            room_id: RoomId::from("private"),
            offer: payload(r#"{"sdp":"v=0"}"#),
        },
    )
    .await
    .unwrap();
    send_client(
        &room_cmd_tx,
        member,
        ClientMessage::Answer {
            room_id: RoomId::from("private"),
            answer: payload(r#"{"sdp":"v=0"}"#),
        },
    )
    .await
    .unwrap();
    let stats = flush(&room_cmd_tx).await.unwrap();

    let delivered = drain(&mut signal_rx);
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].peer_id, member);
    assert_eq!(
        delivered[0].message,
        ServerMessage::Offer {
            offer: payload(r#"{"sdp":"v=0"}"#),
            from: outsider,
        }
    );
    assert!(signaling.delivered_to(&outsider).await.is_empty());
    assert_eq!(stats.members, 1, "sending does not imply joining");
}
