//! Webhook Service の統合テスト
//!
//! 本番と同じルーター（レイヤー込み）をインメモリのモックで組み立て、
//! HTTP リクエストから外部呼び出しの回数までを検証する。

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;
use trainbell_infra::mock::{MockIdentityResolver, MockNotificationSender};
use trainbell_webhook_service::{
    app_builder::build_router,
    handler::WebhookState,
    usecase::{TemplateRenderer, TrainingWebhookUseCaseImpl},
};

const FROM: &str = "noreply@headshots.tryleap.ai";
const SUCCESS_SUBJECT: &str = "Your model was successfully trained!";
const FAILURE_SUBJECT: &str = "Your model failed to train!";

struct TestApp {
    router:   Router,
    resolver: MockIdentityResolver,
    sender:   MockNotificationSender,
}

impl TestApp {
    fn new(resolver: MockIdentityResolver, sender: MockNotificationSender) -> Self {
        let usecase = TrainingWebhookUseCaseImpl::new(
            Arc::new(resolver.clone()),
            Arc::new(sender.clone()),
            TemplateRenderer::new().unwrap(),
            FROM.to_string(),
        );
        let state = Arc::new(WebhookState {
            usecase: Arc::new(usecase),
        });

        Self {
            router: build_router(state),
            resolver,
            sender,
        }
    }

    fn with_user(user_id: &str, email: Option<&str>) -> Self {
        Self::new(
            MockIdentityResolver::new().with_user(user_id, email),
            MockNotificationSender::new(),
        )
    }

    async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

fn failed_body() -> &'static str {
    r#"{"result":{"status":"failed"}}"#
}

#[tokio::test]
async fn user_id欠落はユーザー解決もメール送信もしない() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, body) = app.post("/leap/webhook", failed_body()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(app.resolver.call_count(), 0);
    assert!(app.sender.sent_emails().is_empty());
}

#[tokio::test]
async fn jsonでない本文はユーザー解決もメール送信もしない() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, _) = app.post("/leap/webhook?user_id=u1", "{").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.resolver.call_count(), 0);
    assert!(app.sender.sent_emails().is_empty());
}

#[tokio::test]
async fn 存在しないユーザーは401でメールを送らない() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, body) = app
        .post("/leap/webhook?user_id=ghost", failed_body())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "User not found");
    assert_eq!(app.resolver.resolved_ids(), vec!["ghost".to_string()]);
    assert!(app.sender.sent_emails().is_empty());
}

#[tokio::test]
async fn identityサービスのエラーは401でメッセージを含む() {
    let app = TestApp::new(
        MockIdentityResolver::failing("invalid JWT: unable to parse or verify signature"),
        MockNotificationSender::new(),
    );

    let (status, body) = app.post("/leap/webhook?user_id=u1", failed_body()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["detail"],
        "invalid JWT: unable to parse or verify signature"
    );
    assert!(app.sender.sent_emails().is_empty());
}

// finished は成功メールの 1 通だけを送る（失敗メールへ続けて送ることはしない）
#[tokio::test]
async fn finishedは成功メールを1通だけ送る() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, body) = app
        .post("/leap/webhook?user_id=u1", r#"{"result":{"status":"finished"}}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "success"}));
    let sent = app.sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, SUCCESS_SUBJECT);
}

#[tokio::test]
async fn failedは失敗メールを1通送る() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, _) = app.post("/leap/webhook?user_id=u1", failed_body()).await;

    assert_eq!(status, StatusCode::OK);
    let sent = app.sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, FAILURE_SUBJECT);
}

#[tokio::test]
async fn 通知対象外のステータスは200でメールを送らない() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    for body in [
        r#"{"result":{"status":"queued"}}"#,
        r#"{"result":{}}"#,
        r#"{"result":{"status":null}}"#,
    ] {
        let (status, response) = app.post("/leap/webhook?user_id=u1", body).await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(response, json!({"message": "success"}));
    }
    assert!(app.sender.sent_emails().is_empty());
    assert_eq!(app.resolver.call_count(), 3);
}

#[tokio::test]
async fn 同じリクエストを2回送ると2回とも送信する() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    for _ in 0..2 {
        let (status, _) = app.post("/leap/webhook?user_id=u1", failed_body()).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.resolver.call_count(), 2);
    assert_eq!(app.sender.sent_emails().len(), 2);
}

#[tokio::test]
async fn 送信失敗は500で理由を返さない() {
    let app = TestApp::new(
        MockIdentityResolver::new().with_user("u1", Some("a@x.com")),
        MockNotificationSender::failing("Resend 送信失敗（403）: API key is invalid"),
    );

    let (status, body) = app.post("/leap/webhook?user_id=u1", failed_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Something went wrong!");
    assert!(!body.to_string().contains("API key"));
    assert_eq!(app.sender.sent_emails().len(), 1);
}

#[tokio::test]
async fn 失敗通知がa_x_comに届くまでの一連の流れ() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, body) = app.post("/leap/webhook?user_id=u1", failed_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "success"}));
    assert_eq!(app.resolver.resolved_ids(), vec!["u1".to_string()]);
    let sent = app.sender.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, FROM);
    assert_eq!(sent[0].to, "a@x.com");
    assert_eq!(sent[0].subject, FAILURE_SUBJECT);
    assert!(
        sent[0]
            .html_body
            .contains("<h2>We're writing to notify you that your model training failed!.</h2>")
    );
}

#[tokio::test]
async fn 別名のルートでも受け付ける() {
    let app = TestApp::with_user("u1", Some("a@x.com"));

    let (status, _) = app
        .post("/api/webhooks/training?user_id=u1", failed_body())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.sender.sent_emails().len(), 1);
}

#[tokio::test]
async fn レスポンスにrequest_idヘッダーが付与される() {
    let app = TestApp::with_user("u1", Some("a@x.com"));
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
}
