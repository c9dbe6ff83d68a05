mod support;

use support::{connect, join, recv_close_code, recv_type, send_text};

#[tokio::test]
async fn when_client_keeps_sending_invalid_json_then_connection_is_closed_for_policy() {
    let (mut client, _) = connect().await;

    for _ in 0..11 {
        send_text(&mut client, "not json").await;
    }

    assert_eq!(recv_close_code(&mut client).await, Some(1008));
}

#[tokio::test]
async fn when_a_few_messages_are_invalid_then_join_still_works() {
    let (mut client, player_id) = connect().await;

    for _ in 0..10 {
        send_text(&mut client, "{\"type\":\"Fly\"}").await;
    }
    join(&mut client, "Steady").await;

    let welcome = recv_type(&mut client, "Welcome").await;
    assert_eq!(welcome["data"]["player"]["id"], player_id.as_str());
}
