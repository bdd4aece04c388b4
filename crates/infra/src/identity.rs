//! # Identity 解決
//!
//! Webhook で受け取ったユーザー ID が実在するかを Identity サービスに問い合わせ、
//! 通知先のメールアドレスを取得する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `IdentityResolver` trait で問い合わせ先を抽象化
//! - **権限の局所化**: service-role キーは [`ServiceRoleKey`] に包み、
//!   リゾルバの構築時にだけ渡す。クレート外から平文を取り出す手段は提供しない
//! - **セッションを持たない**: 呼び出し元はトレーニングプロバイダでありエンドユーザーではない。
//!   Cookie やトークンの保存・リフレッシュは行わない

mod supabase;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
pub use supabase::SupabaseIdentityResolver;
use trainbell_domain::user::{ResolvedIdentity, UserId};

use crate::InfraError;

/// Identity サービスの service-role キー
///
/// 「ユーザー ID からユーザーを引く」ためだけにリゾルバへ渡す権限オブジェクト。
/// `Debug` 出力では値が伏せられる。
#[derive(Debug, Clone)]
pub struct ServiceRoleKey(SecretString);

impl ServiceRoleKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// ユーザー解決トレイト
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// ユーザー ID からユーザーを解決する
    ///
    /// ## 戻り値
    ///
    /// - `Ok(Some(_))`: ユーザーが存在する
    /// - `Ok(None)`: ユーザーが存在しない
    /// - `Err(_)`: Identity サービスとの通信失敗、またはサービス側のエラー
    async fn resolve_user(&self, user_id: &UserId)
    -> Result<Option<ResolvedIdentity>, InfraError>;
}
