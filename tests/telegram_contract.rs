//! Telegram notifier contract tests.
//!
//! Verifies the Bot API request format: method path, chat id, MarkdownV2
//! parse mode and escaping.

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xkcd_relay::error::AppError;
use xkcd_relay::models::TelegramConfig;
use xkcd_relay::services::{Notifier, TelegramNotifier};

fn notifier(server: &MockServer) -> TelegramNotifier {
    let config = TelegramConfig {
        bot_token: "123456:ABC-def".to_string(),
        chat_id: "-1001234".to_string(),
        api_url: server.uri(),
    };
    TelegramNotifier::new(Client::new(), &config).unwrap()
}

fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}}))
}

#[tokio::test]
async fn test_send_text_escapes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123456:ABC-def/sendMessage"))
        .and(body_json(json!({
            "chat_id": "-1001234",
            "text": "\\[xkcd Random Bot\\] \\[✅ Up\\] Running\\.",
            "parse_mode": "MarkdownV2"
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server)
        .send_text("[xkcd Random Bot] [✅ Up] Running.")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_send_photo_keeps_caption() {
    let server = MockServer::start().await;
    let caption = "[__*1\\. Barrel*__](https://xkcd.com/1/)\n\nDon't we all\\.";

    Mock::given(method("POST"))
        .and(path("/bot123456:ABC-def/sendPhoto"))
        .and(body_json(json!({
            "chat_id": "-1001234",
            "photo": "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg",
            "caption": caption,
            "parse_mode": "MarkdownV2"
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server)
        .send_photo(caption, "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejection_is_notification_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"chat_id": "-1001234"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: can't parse entities"
        })))
        .mount(&server)
        .await;

    match notifier(&server).send_text("hi").await.unwrap_err() {
        AppError::Notification(message) => {
            assert!(message.contains("400"));
            assert!(message.contains("can't parse entities"));
            assert!(!message.contains("ABC-def"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
