//! Supabase Auth 管理 API によるユーザー解決
//!
//! `GET {SUPABASE_URL}/auth/v1/admin/users/{user_id}` を service-role キーで呼び出す。
//!
//! - 200: ユーザーが存在する
//! - 404: ユーザーが存在しない
//! - それ以外: Identity サービス側のエラー（メッセージを保持して返す）

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use trainbell_domain::user::{ResolvedIdentity, UserId};

use super::{IdentityResolver, ServiceRoleKey};
use crate::InfraError;

const SERVICE_NAME: &str = "Supabase Auth";

/// 管理 API のユーザーレスポンス（使用するフィールドのみ）
#[derive(Debug, Deserialize)]
struct AdminUserResponse {
    #[serde(default)]
    email: Option<String>,
}

/// GoTrue のエラーレスポンス
///
/// バージョンによってメッセージのフィールド名が異なる。
#[derive(Debug, Default, Deserialize)]
struct GoTrueErrorBody {
    msg:               Option<String>,
    message:           Option<String>,
    error_description: Option<String>,
    error:             Option<String>,
}

impl GoTrueErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

/// エラーレスポンスの本文からメッセージを取り出す
///
/// JSON として解釈できない場合は本文をそのまま、本文が空ならステータスの説明を返す。
fn extract_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<GoTrueErrorBody>(body)
        .ok()
        .and_then(GoTrueErrorBody::into_message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}

/// Supabase Auth によるユーザー解決
///
/// reqwest クライアントは Cookie ストアを持たない既定構成で作成する。
pub struct SupabaseIdentityResolver {
    base_url:         String,
    service_role_key: ServiceRoleKey,
    client:           reqwest::Client,
}

impl SupabaseIdentityResolver {
    /// 新しいリゾルバを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: Supabase プロジェクトの URL（例: `https://xyz.supabase.co`）
    /// - `service_role_key`: service-role キー
    /// - `timeout`: リクエスト全体のタイムアウト（`None` なら無制限）
    pub fn new(
        base_url: &str,
        service_role_key: ServiceRoleKey,
        timeout: Option<Duration>,
    ) -> Result<Self, InfraError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key,
            client: builder.build()?,
        })
    }

    fn user_url(&self, user_id: &UserId) -> String {
        format!(
            "{}/auth/v1/admin/users/{}",
            self.base_url,
            urlencoding::encode(user_id.as_str())
        )
    }
}

#[async_trait]
impl IdentityResolver for SupabaseIdentityResolver {
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    async fn resolve_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ResolvedIdentity>, InfraError> {
        let key = self.service_role_key.expose();

        let response = self
            .client
            .get(self.user_url(user_id))
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let user: AdminUserResponse = serde_json::from_str(&body)?;
            let email = user.email.filter(|email| !email.is_empty());
            return Ok(Some(ResolvedIdentity::new(user_id.clone(), email)));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("Supabase Auth: ユーザーが存在しません");
            return Ok(None);
        }

        Err(InfraError::upstream(
            SERVICE_NAME,
            status.as_u16(),
            extract_error_message(status, &body),
        ))
    }
}
