//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: Resend（本番用）、SMTP（Mailpit 開発用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択

mod resend;
mod smtp;

use async_trait::async_trait;
pub use resend::ResendNotificationSender;
pub use smtp::SmtpNotificationSender;
use trainbell_domain::notification::{EmailMessage, NotificationError};

/// メール送信トレイト
///
/// 送信元・宛先・件名・本文はすべて [`EmailMessage`] が持つ。
/// 実装は送信を 1 回だけ試み、リトライしない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
