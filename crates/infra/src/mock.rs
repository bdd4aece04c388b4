//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! trainbell-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! いずれのモックも `Clone` で内部状態を共有する。ユースケースに渡したあとも
//! テスト側のハンドルから呼び出し記録を確認できる。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use trainbell_domain::{
    notification::{EmailMessage, NotificationError},
    user::{ResolvedIdentity, UserId},
};

use crate::{error::InfraError, identity::IdentityResolver, notification::NotificationSender};

// ===== MockIdentityResolver =====

/// インメモリのユーザー解決
///
/// 登録されていないユーザー ID は「存在しない」として扱う。
#[derive(Clone, Default)]
pub struct MockIdentityResolver {
    users:        Arc<Mutex<HashMap<String, Option<String>>>>,
    failure:      Option<String>,
    resolved_ids: Arc<Mutex<Vec<String>>>,
}

impl MockIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// ユーザーを登録する（`email` が `None` ならメールアドレス未設定のユーザー）
    pub fn with_user(self, user_id: &str, email: Option<&str>) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(user_id.to_string(), email.map(str::to_string));
        self
    }

    /// 常に Identity サービスのエラーを返すモックを作成する
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// `resolve_user` が呼ばれた回数
    pub fn call_count(&self) -> usize {
        self.resolved_ids.lock().unwrap().len()
    }

    /// `resolve_user` に渡されたユーザー ID（呼び出し順）
    pub fn resolved_ids(&self) -> Vec<String> {
        self.resolved_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityResolver for MockIdentityResolver {
    async fn resolve_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ResolvedIdentity>, InfraError> {
        self.resolved_ids
            .lock()
            .unwrap()
            .push(user_id.as_str().to_string());

        if let Some(message) = &self.failure {
            return Err(InfraError::upstream("Mock Identity", 500, message.clone()));
        }

        Ok(self
            .users
            .lock()
            .unwrap()
            .get(user_id.as_str())
            .map(|email| ResolvedIdentity::new(user_id.clone(), email.clone())))
    }
}

// ===== MockNotificationSender =====

/// 送信したメールを記録するモック
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent_emails: Arc<Mutex<Vec<EmailMessage>>>,
    failure:     Option<String>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信失敗を返すモックを作成する（送信の試行は記録される）
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// 送信を試みたメール（呼び出し順）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent_emails.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.sent_emails.lock().unwrap().push(email.clone());

        match &self.failure {
            Some(message) => Err(NotificationError::SendFailed(message.clone())),
            None => Ok(()),
        }
    }
}
