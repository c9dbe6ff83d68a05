mod support;

use serde_json::Value;
use support::{Client, connect, join, recv_type};

/// Reads messages of type `kind` until one is about `player_id`.
async fn recv_about(client: &mut Client, kind: &str, player_id: &str) -> Value {
    loop {
        let msg = recv_type(client, kind).await;
        let id = msg["data"]["id"]
            .as_str()
            .or_else(|| msg["data"]["player_id"].as_str());
        if id == Some(player_id) {
            return msg;
        }
    }
}

#[tokio::test]
async fn when_name_is_empty_then_error_is_returned() {
    let (mut client, _) = connect().await;

    join(&mut client, "").await;

    let error = recv_type(&mut client, "Error").await;
    assert_eq!(error["data"]["message"], "Name can't be null");
}

#[tokio::test]
async fn when_name_is_too_long_then_error_is_returned() {
    let (mut client, _) = connect().await;

    join(&mut client, "abcdefghijklmno").await;

    let error = recv_type(&mut client, "Error").await;
    assert_eq!(error["data"]["message"], "Name is too long");
}

#[tokio::test]
async fn when_name_has_fourteen_chars_then_welcome_and_updates_follow() {
    let (mut client, player_id) = connect().await;

    join(&mut client, "abcdefghijklmn").await;

    let welcome = recv_type(&mut client, "Welcome").await;
    assert_eq!(welcome["data"]["player"]["id"], player_id.as_str());
    assert_eq!(welcome["data"]["player"]["name"], "abcdefghijklmn");
    assert_eq!(welcome["data"]["player"]["health"], 3);
    assert!(welcome["data"]["islands"].as_array().is_some());

    let update = recv_type(&mut client, "WorldUpdate").await;
    assert!(update["data"]["tick"].as_u64().is_some());
    assert!(update["data"]["zone"]["radius"].as_f64().is_some());
}

#[tokio::test]
async fn when_rejected_join_is_retried_then_it_succeeds() {
    let (mut client, player_id) = connect().await;

    join(&mut client, "").await;
    recv_type(&mut client, "Error").await;
    join(&mut client, "Retry").await;

    let welcome = recv_type(&mut client, "Welcome").await;
    assert_eq!(welcome["data"]["player"]["id"], player_id.as_str());
}

#[tokio::test]
async fn when_second_player_joins_and_leaves_then_first_player_is_told() {
    let (mut first, _) = connect().await;
    join(&mut first, "First").await;
    recv_type(&mut first, "Welcome").await;

    let (mut second, second_id) = connect().await;
    join(&mut second, "Second").await;
    recv_type(&mut second, "Welcome").await;

    let created = recv_about(&mut first, "PlayerCreated", &second_id).await;
    assert_eq!(created["data"]["name"], "Second");

    drop(second);
    recv_about(&mut first, "PlayerLeft", &second_id).await;
}
