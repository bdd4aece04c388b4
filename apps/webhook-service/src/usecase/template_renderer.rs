//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! - テンプレートは `include_str!` でバイナリに埋め込む
//! - HTML は `base.html` を継承し、本文ブロックだけをテンプレートごとに持つ
//! - 件名はテンプレート種別ごとに固定（[`NotificationTemplate::subject`]）

use tera::{Context, Tera};
use trainbell_domain::notification::{EmailMessage, NotificationError, NotificationTemplate};

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "base.html",
                    include_str!("../../templates/notifications/base.html"),
                ),
                (
                    "training_succeeded.html",
                    include_str!("../../templates/notifications/training_succeeded.html"),
                ),
                (
                    "training_succeeded.txt",
                    include_str!("../../templates/notifications/training_succeeded.txt"),
                ),
                (
                    "training_failed.html",
                    include_str!("../../templates/notifications/training_failed.html"),
                ),
                (
                    "training_failed.txt",
                    include_str!("../../templates/notifications/training_failed.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// テンプレート種別からメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `template`: 通知テンプレート種別
    /// - `from`: 送信元アドレス
    /// - `to`: 送信先アドレス（空でもそのまま設定する）
    pub fn render(
        &self,
        template: NotificationTemplate,
        from: &str,
        to: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let template_name = template.template_name();
        let subject = template.subject();

        let mut context = Context::new();
        context.insert("subject", subject);

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            html_body,
            text_body,
        })
    }
}
