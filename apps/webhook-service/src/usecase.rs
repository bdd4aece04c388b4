//! # ユースケース層
//!
//! Webhook Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラはトレイトにのみ依存する
//! - **依存性注入**: ユーザー解決とメール送信は外部から注入
//! - **薄いハンドラ**: ハンドラは入力の取り出しだけを行い、判断はユースケースに集約

pub mod template_renderer;
pub mod training_webhook;

use async_trait::async_trait;
pub use template_renderer::TemplateRenderer;
pub use training_webhook::TrainingWebhookUseCaseImpl;
use trainbell_domain::{notification::NotificationTemplate, user::UserId};

use crate::error::WebhookError;

/// Webhook 1 件の処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// メールを 1 通送信した
    Sent(NotificationTemplate),
    /// 通知対象外のステータスだったため送信しなかった
    Skipped,
}

/// トレーニング Webhook ユースケーストレイト
#[async_trait]
pub trait TrainingWebhookUseCase: Send + Sync {
    /// トレーニング結果イベントを処理する
    ///
    /// ## 引数
    ///
    /// - `user_id`: クエリ文字列で渡されたユーザー ID
    /// - `status`: `result.status`（文字列でない場合は `None`）
    ///
    /// ## 処理順序
    ///
    /// ユーザー解決 → 結果の分類 → メール生成 → 送信。いずれも 1 回だけ行い、リトライしない。
    async fn handle_training_event(
        &self,
        user_id: &UserId,
        status: Option<&str>,
    ) -> Result<DispatchOutcome, WebhookError>;
}
