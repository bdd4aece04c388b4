//! # トレーニング Webhook ハンドラ
//!
//! トレーニングプロバイダからのコールバックを受け付ける。
//!
//! ## エンドポイント
//!
//! - `POST /leap/webhook?user_id={id}`
//! - `POST /api/webhooks/training?user_id={id}`
//!
//! 本文は `{"result": {"status": "...", ...}}`。`result.status` 以外は読まない。
//! `user_id` が複数回指定された場合は最初の値を使う。

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{RawQuery, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trainbell_domain::user::UserId;

use crate::{error::WebhookError, usecase::TrainingWebhookUseCase};

/// Webhook ハンドラの共有状態
pub struct WebhookState {
    pub usecase: Arc<dyn TrainingWebhookUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// Webhook 本文
///
/// `result` はオブジェクト以外の値も受け付け、`status` を持たないものとして扱う。
/// 欠落と `null` だけを不正な本文とみなす。
#[derive(Debug, Deserialize)]
pub struct TrainingWebhookPayload {
    #[serde(default)]
    pub result: Option<Value>,
}

impl TrainingWebhookPayload {
    /// `result.status` が文字列ならそれを返す
    pub fn status_str(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|result| result.get("status"))
            .and_then(Value::as_str)
    }
}

/// クエリ文字列から最初の `user_id` を取り出す
fn first_user_id(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "user_id")
        .map(|(_, value)| value.into_owned())
}

/// Webhook レスポンス
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
}

// --- ハンドラ ---

/// POST /leap/webhook
///
/// `user_id` を検証し、本文から `result.status` を取り出してユースケースに渡す。
/// メールを送ったかどうかに関わらず、成功時は `{"message":"success"}` を返す。
pub async fn receive_training_webhook(
    State(state): State<Arc<WebhookState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookError> {
    let user_id = UserId::new(first_user_id(query.as_deref()).unwrap_or_default())
        .map_err(|e| WebhookError::MalformedRequest(e.to_string()))?;

    let payload: TrainingWebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        WebhookError::MalformedRequest(format!("リクエスト本文を解釈できません: {e}"))
    })?;
    if payload.result.is_none() {
        return Err(WebhookError::MalformedRequest("result は必須です".to_string()));
    }

    state
        .usecase
        .handle_training_event(&user_id, payload.status_str())
        .await?;

    Ok(Json(WebhookResponse { message: "success" }))
}
