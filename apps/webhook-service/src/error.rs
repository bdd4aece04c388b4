//! # Webhook Service エラー定義
//!
//! Webhook 処理で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | ステータス | detail |
//! |-------|-----------|--------|
//! | `MalformedRequest` | 400 | 入力の問題点 |
//! | `IdentityLookup` | 401 | Identity サービスが返したメッセージ |
//! | `UserNotFound` | 401 | 固定文言 |
//! | `Dispatch` | 500 | 固定文言（失敗理由はサーバーログのみ） |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use trainbell_domain::notification::NotificationError;
use trainbell_infra::{InfraError, InfraErrorKind};
use trainbell_shared::ErrorResponse;

/// Webhook 処理で発生するエラー
#[derive(Debug, Error)]
pub enum WebhookError {
    /// リクエストの形式が不正（`user_id` 欠落、本文が JSON でない等）
    #[error("不正なリクエスト: {0}")]
    MalformedRequest(String),

    /// Identity サービスでのユーザー解決に失敗
    #[error("ユーザー解決に失敗: {0}")]
    IdentityLookup(#[from] InfraError),

    /// ユーザーが存在しない
    #[error("ユーザーが見つかりません")]
    UserNotFound,

    /// メールの生成または送信に失敗
    #[error("通知送信に失敗: {0}")]
    Dispatch(#[from] NotificationError),
}

impl WebhookError {
    /// Identity サービスが返したメッセージ（なければエラー全体の表示）
    fn identity_detail(err: &InfraError) -> String {
        match err.kind() {
            InfraErrorKind::Upstream { message, .. } => message.clone(),
            _ => err.to_string(),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let body = match &self {
            WebhookError::MalformedRequest(detail) => ErrorResponse::bad_request(detail.clone()),
            WebhookError::IdentityLookup(e) => {
                ErrorResponse::unauthorized(Self::identity_detail(e))
            }
            WebhookError::UserNotFound => ErrorResponse::new(
                "user-not-found",
                "Unauthorized",
                401,
                "User not found",
            ),
            WebhookError::Dispatch(e) => {
                tracing::error!(error = %e, "通知送信エラーを 500 として返します");
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
