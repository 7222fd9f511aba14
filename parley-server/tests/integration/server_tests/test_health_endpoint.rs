use parley_server::RelayConfig;
use serde_json::json;

use crate::integration::{init_tracing, spawn_test_server};
use crate::utils::{TestClient, fetch_health, wait_for_health};

#[tokio::test]
async fn test_health_tracks_rooms_and_connections() {
    init_tracing();

    let addr = spawn_test_server(RelayConfig::default()).await;

    let health = fetch_health(addr).await.unwrap();
    assert_eq!(
        health,
        json!({"status": "ok", "connections": 0, "rooms": 0, "members": 0})
    );

    let mut a = TestClient::connect(addr).await.unwrap();
    a.join("one").await.unwrap();
    a.join("two").await.unwrap();

    let health = wait_for_health(addr, |h| h["rooms"] == 2).await.unwrap();
    assert_eq!(health["connections"], 1);
    assert_eq!(health["members"], 1);

    a.close().await.unwrap();

    wait_for_health(addr, |h| {
        h["connections"] == 0 && h["rooms"] == 0 && h["members"] == 0
    })
    .await
    .expect("rooms are cleaned up after disconnect");
}
