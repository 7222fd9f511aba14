use parley_core::{ClientMessage, ConnectionId, RoomId, ServerMessage};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{drain, flush, join, next_delivery, payload, send_client};

#[tokio::test]
async fn test_offer_reaches_peer_with_sender_id() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, signaling) = create_test_relay(false);
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    join(&room_cmd_tx, a, "abc123").await.unwrap();
    join(&room_cmd_tx, b, "abc123").await.unwrap();
    flush(&room_cmd_tx).await.unwrap();
    drain(&mut signal_rx);

    send_client(
        &room_cmd_tx,
        a,
        ClientMessage::Offer {
            room_id: RoomId::from("abc123"),
            offer: payload(r#"{"sdp":"v=0..."}"#),
        },
    )
    .await
    .unwrap();

    let delivered = next_delivery(&mut signal_rx).await.unwrap();
    assert_eq!(delivered.peer_id, b);
    assert_eq!(
        delivered.message,
        ServerMessage::Offer {
            offer: payload(r#"{"sdp":"v=0..."}"#),
            from: a,
        }
    );

    flush(&room_cmd_tx).await.unwrap();
    assert_eq!(
        signaling.delivered_to(&a).await,
        vec![ServerMessage::UserJoined(b)],
        "no echo to sender"
    );
}

#[tokio::test]
async fn test_payload_is_forwarded_untouched() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, _signaling) = create_test_relay(false);
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    join(&room_cmd_tx, a, "r").await.unwrap();
    join(&room_cmd_tx, b, "r").await.unwrap();
    flush(&room_cmd_tx).await.unwrap();
    drain(&mut signal_rx);

    let sent = payload(concat!(
        r#"{"type":"offer", "sdp":"v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n","#,
        r#""extra":[1, 2.50, 1e3, 18446744073709551616, null, {"nested": true}],"#,
        r#""unicode":"h\u00e9llo ✓"}"#,
    ));
    send_client(
        &room_cmd_tx,
        a,
        ClientMessage::Offer {
            room_id: RoomId::from("r"),
            offer: sent.clone(),
        },
    )
    .await
    .unwrap();

    let ServerMessage::Offer { offer, from } = next_delivery(&mut signal_rx).await.unwrap().message
    else {
        panic!("expected an offer");
    };
    assert_eq!(offer.as_str(), sent.as_str());
    assert_eq!(from, a);
}
