//! # トレーニング Webhook ユースケース
//!
//! トレーニングプロバイダからの完了/失敗コールバックを受け、
//! ユーザーを解決して結果メールを 1 通送る。
//!
//! ## 結果の分類
//!
//! | `result.status` | メール |
//! |-----------------|--------|
//! | `finished` | 成功テンプレートを 1 通 |
//! | `failed` | 失敗テンプレートを 1 通 |
//! | それ以外 / 欠落 | 送信しない |
//!
//! `finished` で失敗テンプレートも続けて送ることはしない。

use std::sync::Arc;

use async_trait::async_trait;
use trainbell_domain::{training::TrainingOutcome, user::UserId};
use trainbell_infra::{identity::IdentityResolver, notification::NotificationSender};
use trainbell_shared::{
    event_log::{error, event},
    log_business_event,
};

use super::{DispatchOutcome, TemplateRenderer, TrainingWebhookUseCase};
use crate::error::WebhookError;

/// トレーニング Webhook ユースケースの実装
pub struct TrainingWebhookUseCaseImpl {
    identity_resolver:   Arc<dyn IdentityResolver>,
    notification_sender: Arc<dyn NotificationSender>,
    template_renderer:   TemplateRenderer,
    from_address:        String,
}

impl TrainingWebhookUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        identity_resolver: Arc<dyn IdentityResolver>,
        notification_sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        from_address: String,
    ) -> Self {
        Self {
            identity_resolver,
            notification_sender,
            template_renderer,
            from_address,
        }
    }

    /// トレーニング結果イベントを処理する
    pub async fn handle_training_event(
        &self,
        user_id: &UserId,
        status: Option<&str>,
    ) -> Result<DispatchOutcome, WebhookError> {
        let identity = match self.identity_resolver.resolve_user(user_id).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                tracing::warn!(
                    error.category = error::category::CLIENT_INPUT,
                    error.kind = error::kind::USER_NOT_FOUND,
                    user_id = %user_id,
                    "Webhook のユーザーが存在しません"
                );
                return Err(WebhookError::UserNotFound);
            }
            Err(e) => {
                tracing::error!(
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::USER_LOOKUP,
                    user_id = %user_id,
                    error = %e,
                    "ユーザー解決に失敗しました"
                );
                return Err(WebhookError::IdentityLookup(e));
            }
        };

        let outcome = TrainingOutcome::classify(status);
        let recipient = identity.contact_address();

        log_business_event!(
            event.category = event::category::WEBHOOK,
            event.action = event::action::TRAINING_WEBHOOK_RECEIVED,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user_id,
            event.result = event::result::SUCCESS,
            training.status = status.unwrap_or("-"),
            training.outcome = %outcome,
            recipient = recipient,
            "トレーニング Webhook を受信"
        );

        let Some(template) = outcome.notification_template() else {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::USER,
                event.entity_id = %user_id,
                event.result = event::result::SUCCESS,
                training.outcome = %outcome,
                "通知対象外のステータスのため送信しません"
            );
            return Ok(DispatchOutcome::Skipped);
        };

        if recipient.is_empty() {
            tracing::warn!(
                user_id = %user_id,
                "ユーザーのメールアドレスが未設定ですが送信を試みます"
            );
        }

        let email = self
            .template_renderer
            .render(template, &self.from_address, recipient)
            .inspect_err(|e| {
                tracing::error!(
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::TEMPLATE,
                    template = template.template_name(),
                    error = %e,
                    "メールテンプレートのレンダリングに失敗しました"
                );
            })?;

        if let Err(e) = self.notification_sender.send_email(&email).await {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.entity_type = event::entity_type::USER,
                event.entity_id = %user_id,
                event.result = event::result::FAILURE,
                template = template.template_name(),
                "通知メールの送信に失敗"
            );
            tracing::error!(
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error::kind::EMAIL_DELIVERY,
                user_id = %user_id,
                template = template.template_name(),
                error = %e,
                "通知メールの送信に失敗しました"
            );
            return Err(WebhookError::Dispatch(e));
        }

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_SENT,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user_id,
            event.result = event::result::SUCCESS,
            template = template.template_name(),
            "通知メールを送信"
        );

        Ok(DispatchOutcome::Sent(template))
    }
}

#[async_trait]
impl TrainingWebhookUseCase for TrainingWebhookUseCaseImpl {
    async fn handle_training_event(
        &self,
        user_id: &UserId,
        status: Option<&str>,
    ) -> Result<DispatchOutcome, WebhookError> {
        TrainingWebhookUseCaseImpl::handle_training_event(self, user_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use trainbell_domain::notification::NotificationTemplate;
    use trainbell_infra::mock::{MockIdentityResolver, MockNotificationSender};

    use super::*;

    const FROM: &str = "noreply@headshots.tryleap.ai";

    fn sut(
        resolver: &MockIdentityResolver,
        sender: &MockNotificationSender,
    ) -> TrainingWebhookUseCaseImpl {
        TrainingWebhookUseCaseImpl::new(
            Arc::new(resolver.clone()),
            Arc::new(sender.clone()),
            TemplateRenderer::new().unwrap(),
            FROM.to_string(),
        )
    }

    fn user_id(value: &str) -> UserId {
        UserId::new(value).unwrap()
    }

    #[rstest]
    #[case("finished", NotificationTemplate::TrainingSucceeded, "Your model was successfully trained!")]
    #[case("failed", NotificationTemplate::TrainingFailed, "Your model failed to train!")]
    #[tokio::test]
    async fn 通知対象のステータスでメールを1通送信する(
        #[case] status: &str,
        #[case] expected_template: NotificationTemplate,
        #[case] expected_subject: &str,
    ) {
        // Given
        let resolver = MockIdentityResolver::new().with_user("u1", Some("a@x.com"));
        let sender = MockNotificationSender::new();
        let sut = sut(&resolver, &sender);

        // When
        let outcome = sut
            .handle_training_event(&user_id("u1"), Some(status))
            .await
            .unwrap();

        // Then
        assert_eq!(outcome, DispatchOutcome::Sent(expected_template));
        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, FROM);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, expected_subject);
    }

    #[rstest]
    #[case(Some("running"))]
    #[case(Some("FINISHED"))]
    #[case(Some(""))]
    #[case(None)]
    #[tokio::test]
    async fn 通知対象外のステータスでは送信しない(#[case] status: Option<&str>) {
        let resolver = MockIdentityResolver::new().with_user("u1", Some("a@x.com"));
        let sender = MockNotificationSender::new();
        let sut = sut(&resolver, &sender);

        let outcome = sut
            .handle_training_event(&user_id("u1"), status)
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Skipped);
        assert!(sender.sent_emails().is_empty());
        assert_eq!(resolver.call_count(), 1);
    }

    #[tokio::test]
    async fn 存在しないユーザーはuser_not_foundで送信しない() {
        let resolver = MockIdentityResolver::new();
        let sender = MockNotificationSender::new();
        let sut = sut(&resolver, &sender);

        let result = sut
            .handle_training_event(&user_id("ghost"), Some("failed"))
            .await;

        assert!(matches!(result, Err(WebhookError::UserNotFound)));
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn ユーザー解決の失敗はidentity_lookupで送信しない() {
        let resolver = MockIdentityResolver::failing("invalid JWT");
        let sender = MockNotificationSender::new();
        let sut = sut(&resolver, &sender);

        let result = sut
            .handle_training_event(&user_id("u1"), Some("finished"))
            .await;

        match result {
            Err(WebhookError::IdentityLookup(e)) => {
                assert!(e.to_string().contains("invalid JWT"), "{e}");
            }
            other => panic!("IdentityLookup であること: {other:?}"),
        }
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn メールアドレス未設定でも空の宛先で送信を試みる() {
        let resolver = MockIdentityResolver::new().with_user("u1", None);
        let sender = MockNotificationSender::new();
        let sut = sut(&resolver, &sender);

        sut.handle_training_event(&user_id("u1"), Some("failed"))
            .await
            .unwrap();

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "");
    }

    #[tokio::test]
    async fn 送信失敗はdispatchエラーになり再送しない() {
        let resolver = MockIdentityResolver::new().with_user("u1", Some("a@x.com"));
        let sender = MockNotificationSender::failing("provider down");
        let sut = sut(&resolver, &sender);

        let result = sut
            .handle_training_event(&user_id("u1"), Some("failed"))
            .await;

        assert!(matches!(result, Err(WebhookError::Dispatch(_))));
        assert_eq!(sender.sent_emails().len(), 1);
    }
}
