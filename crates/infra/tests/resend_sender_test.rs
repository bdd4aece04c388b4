//! Resend によるメール送信の統合テスト
//!
//! httpmock で Resend API を模擬し、実ネットワークには接続しない。

use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::json;
use trainbell_domain::notification::{EmailMessage, NotificationError};
use trainbell_infra::notification::{NotificationSender, ResendNotificationSender};

const API_KEY: &str = "re_test_key";

fn sut(server: &MockServer) -> ResendNotificationSender {
    ResendNotificationSender::new(&server.base_url(), SecretString::from(API_KEY), None).unwrap()
}

fn email() -> EmailMessage {
    EmailMessage {
        from:      "noreply@headshots.tryleap.ai".to_string(),
        to:        "a@x.com".to_string(),
        subject:   "Your model was successfully trained!".to_string(),
        html_body: "<h2>ok</h2>".to_string(),
        text_body: "ok".to_string(),
    }
}

#[tokio::test]
async fn メールを送信する() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/emails")
            .header("authorization", format!("Bearer {API_KEY}"))
            .json_body(json!({
                "from": "noreply@headshots.tryleap.ai",
                "to": ["a@x.com"],
                "subject": "Your model was successfully trained!",
                "html": "<h2>ok</h2>",
                "text": "ok",
            }));
        then.status(200)
            .json_body(json!({"id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"}));
    });

    let result = sut(&server).send_email(&email()).await;

    assert!(result.is_ok(), "{result:?}");
    mock.assert_calls(1);
}

#[tokio::test]
async fn エラーレスポンスはメッセージ付きの送信失敗になる() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/emails");
        then.status(422).json_body(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "Invalid `to` field."
        }));
    });

    let err = sut(&server).send_email(&email()).await.unwrap_err();

    mock.assert_calls(1);
    match err {
        NotificationError::SendFailed(message) => {
            assert!(message.contains("422"), "{message}");
            assert!(message.contains("Invalid `to` field."), "{message}");
        }
        other => panic!("SendFailed であること: {other:?}"),
    }
}

#[tokio::test]
async fn 送信失敗時にリトライしない() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/emails");
        then.status(500).body("internal error");
    });

    let err = sut(&server).send_email(&email()).await.unwrap_err();

    mock.assert_calls(1);
    assert!(err.to_string().contains("internal error"), "{err}");
}
