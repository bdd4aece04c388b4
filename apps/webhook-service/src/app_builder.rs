//! # Webhook Service アプリケーション構築
//!
//! 送信バックエンドの選択とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use trainbell_domain::notification::NotificationError;
use trainbell_infra::notification::{
    NotificationSender,
    ResendNotificationSender,
    SmtpNotificationSender,
};
use trainbell_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::{NotificationBackend, WebhookConfig},
    handler::{WebhookState, health_check, receive_training_webhook},
};

/// 設定に応じたメール送信実装を作成する
pub fn create_notification_sender(
    config: &WebhookConfig,
) -> Result<Arc<dyn NotificationSender>, NotificationError> {
    let notification = &config.notification;

    let sender: Arc<dyn NotificationSender> = match notification.backend {
        NotificationBackend::Resend => Arc::new(ResendNotificationSender::new(
            &notification.resend_api_url,
            config.resend_api_key.clone(),
            config.outbound_timeout,
        )?),
        NotificationBackend::Smtp => Arc::new(SmtpNotificationSender::new(
            &notification.smtp_host,
            notification.smtp_port,
        )),
    };

    tracing::info!(
        backend = %notification.backend,
        from = %notification.from_address,
        "通知バックエンドを初期化しました"
    );

    Ok(sender)
}

/// ルーターを構築する
///
/// レイヤー順序（下に書いたものが外側）:
///
/// 1. `SetRequestIdLayer`（最外）: UUID v7 の Request ID を付与（クライアント提供値を優先）
/// 2. `TraceLayer`: request_id を含むスパンを作成し、全ログに注入
/// 3. `PropagateRequestIdLayer`: レスポンスヘッダーに `X-Request-Id` をコピー
/// 4. `CanonicalLogLineLayer`: リクエストごとのサマリログ
pub fn build_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/leap/webhook", post(receive_training_webhook))
        .route("/api/webhooks/training", post(receive_training_webhook))
        .with_state(state)
        .layer(CanonicalLogLineLayer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
