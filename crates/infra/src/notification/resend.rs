//! Resend 通知送信実装
//!
//! Resend の HTTP API（`POST /emails`）を使用してメールを送信する。
//! 本番環境で使用する。

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use trainbell_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Resend の送信リクエスト
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from:    &'a str,
    to:      [&'a str; 1],
    subject: &'a str,
    html:    &'a str,
    text:    &'a str,
}

impl<'a> From<&'a EmailMessage> for SendEmailRequest<'a> {
    fn from(email: &'a EmailMessage) -> Self {
        Self {
            from:    &email.from,
            to:      [email.to.as_str()],
            subject: &email.subject,
            html:    &email.html_body,
            text:    &email.text_body,
        }
    }
}

/// Resend の送信成功レスポンス
#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Resend のエラーレスポンス
#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: String,
}

/// Resend 通知送信
pub struct ResendNotificationSender {
    base_url: String,
    api_key:  SecretString,
    client:   reqwest::Client,
}

impl ResendNotificationSender {
    /// 新しい Resend 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `base_url`: Resend API のベース URL（例: `https://api.resend.com`）
    /// - `api_key`: Resend API キー
    /// - `timeout`: リクエスト全体のタイムアウト（`None` なら無制限）
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, NotificationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NotificationError::SendFailed(format!("HTTP クライアント構築失敗: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl NotificationSender for ResendNotificationSender {
    #[tracing::instrument(skip_all, fields(subject = %email.subject))]
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&SendEmailRequest::from(email))
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Resend 通信エラー: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Resend 通信エラー: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ResendErrorBody>(&body)
                .map(|error| error.message)
                .unwrap_or(body);
            return Err(NotificationError::SendFailed(format!(
                "Resend 送信失敗（{}）: {message}",
                status.as_u16()
            )));
        }

        match serde_json::from_str::<SendEmailResponse>(&body) {
            Ok(sent) => tracing::debug!(email_id = %sent.id, "Resend: メール送信を受け付け"),
            Err(e) => tracing::debug!(error = %e, "Resend: 送信 ID を取得できませんでした"),
        }

        Ok(())
    }
}
