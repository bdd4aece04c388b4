//! # 通知
//!
//! トレーニング結果メールに関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`NotificationTemplate`] | 通知テンプレート種別 | 2 種類: トレーニング成功、トレーニング失敗 |
//! | [`EmailMessage`] | 通知メッセージ | 送信元・宛先・件名・本文。送信後に破棄される |
//!
//! ## 設計方針
//!
//! - **固定テンプレート**: 件名・本文はテンプレートごとに固定。ジョブ固有の情報は埋め込まない
//! - **テンプレート分離**: 種別とメール生成は分離（TemplateRenderer は webhook-service）

use strum::IntoStaticStr;
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知テンプレート種別
///
/// テンプレートファイル名の接頭辞として snake_case で使用される
/// （例: `training_succeeded.html`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationTemplate {
    /// トレーニング成功
    TrainingSucceeded,
    /// トレーニング失敗
    TrainingFailed,
}

impl NotificationTemplate {
    /// 件名（固定）
    pub fn subject(&self) -> &'static str {
        match self {
            Self::TrainingSucceeded => "Your model was successfully trained!",
            Self::TrainingFailed => "Your model failed to train!",
        }
    }

    /// テンプレート名（拡張子なし）
    pub fn template_name(&self) -> &'static str {
        self.into()
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元メールアドレス
    pub from:      String,
    /// 送信先メールアドレス（空の場合もある）
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn テンプレート名はsnake_caseになる() {
        assert_eq!(
            NotificationTemplate::TrainingSucceeded.template_name(),
            "training_succeeded"
        );
        assert_eq!(
            NotificationTemplate::TrainingFailed.template_name(),
            "training_failed"
        );
    }

    #[test]
    fn 件名はテンプレートごとに固定() {
        assert_eq!(
            NotificationTemplate::TrainingSucceeded.subject(),
            "Your model was successfully trained!"
        );
        assert_eq!(
            NotificationTemplate::TrainingFailed.subject(),
            "Your model failed to train!"
        );
    }

    #[test]
    fn notification_errorのメッセージに原因を含む() {
        let error = NotificationError::SendFailed("422 invalid `to` field".to_string());

        assert_eq!(
            error.to_string(),
            "メール送信に失敗: 422 invalid `to` field"
        );
    }
}
