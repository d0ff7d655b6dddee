//! Exercises the bot client against a stub Telegram API bound on loopback.

use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, routing::post};
use chrono::{Duration, Utc};
use gatepass_bot::{BotClient, BotError};
use serde_json::{Value, json};

#[derive(Default)]
struct Stub {
    calls: Mutex<Vec<(String, Value)>>,
    fail_invites: bool,
}

impl Stub {
    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

async fn send_message(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Json<Value> {
    stub.calls
        .lock()
        .unwrap()
        .push(("sendMessage".into(), body));
    Json(json!({ "ok": true, "result": { "message_id": 1 } }))
}

async fn create_invite_link(
    State(stub): State<Arc<Stub>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.calls
        .lock()
        .unwrap()
        .push(("createChatInviteLink".into(), body));
    if stub.fail_invites {
        return Json(json!({ "ok": false, "description": "Bad Request: not enough rights" }));
    }
    Json(json!({ "ok": true, "result": { "invite_link": "https://t.me/+stub-invite" } }))
}

async fn spawn_stub(fail_invites: bool) -> (String, Arc<Stub>) {
    let stub = Arc::new(Stub {
        calls: Mutex::new(Vec::new()),
        fail_invites,
    });
    let app = Router::new()
        .route("/sendMessage", post(send_message))
        .route("/createChatInviteLink", post(create_invite_link))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base, stub)
}

#[tokio::test]
async fn send_message_posts_markdown_payload() {
    let (base, stub) = spawn_stub(false).await;
    let bot = BotClient::with_base_url(base);

    bot.send_message("1001", "🎉 *approved*", true).await.unwrap();

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    let (method, body) = &calls[0];
    assert_eq!(method, "sendMessage");
    assert_eq!(body["chat_id"], "1001");
    assert_eq!(body["text"], "🎉 *approved*");
    assert_eq!(body["parse_mode"], "Markdown");
}

#[tokio::test]
async fn plain_message_omits_parse_mode() {
    let (base, stub) = spawn_stub(false).await;
    let bot = BotClient::with_base_url(base);

    bot.send_message("1001", "sorry", false).await.unwrap();

    let (_, body) = &stub.calls()[0];
    assert!(body.get("parse_mode").is_none());
}

#[tokio::test]
async fn create_invite_link_returns_link_with_policy() {
    let (base, stub) = spawn_stub(false).await;
    let bot = BotClient::with_base_url(base);

    let expire_at = Utc::now() + Duration::seconds(86400);
    let link = bot
        .create_invite_link("-100777", 1, expire_at)
        .await
        .unwrap();
    assert_eq!(link, "https://t.me/+stub-invite");

    let (method, body) = &stub.calls()[0];
    assert_eq!(method, "createChatInviteLink");
    assert_eq!(body["chat_id"], "-100777");
    assert_eq!(body["member_limit"], 1);
    assert_eq!(body["expire_date"], expire_at.timestamp());
}

#[tokio::test]
async fn api_refusal_surfaces_as_error() {
    let (base, _stub) = spawn_stub(true).await;
    let bot = BotClient::with_base_url(base);

    let err = bot
        .create_invite_link("-100777", 1, Utc::now())
        .await
        .unwrap_err();
    match err {
        BotError::Api(description) => assert!(description.contains("not enough rights")),
        other => panic!("expected Api error, got {other:?}"),
    }
}
