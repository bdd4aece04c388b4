//! # ユーザー
//!
//! Webhook で受け取るユーザー識別子と、Identity サービスで解決した結果を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`UserId`] | ユーザー ID | トレーニングプロバイダがクエリ文字列で返してくる不透明な識別子 |
//! | [`ResolvedIdentity`] | 解決済みアイデンティティ | Identity サービスが存在を確認したユーザーと連絡先 |
//!
//! ## 設計方針
//!
//! - **不透明な識別子**: 形式（UUID 等）は検証しない。空でないことだけを保証する
//! - **連絡先は任意**: Identity サービス上でメールアドレスが未登録のユーザーも存在する

use crate::DomainError;

/// ユーザー ID（値オブジェクト）
///
/// Identity サービス側のユーザー識別子。形式は問わず、空文字列だけを受け付けない。
/// 空白のみの値もそのまま Identity サービスに問い合わせる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct UserId(String);

impl UserId {
    /// ユーザー ID を作成する
    ///
    /// # エラー
    ///
    /// 空文字列の場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation("user_id は必須です".to_string()));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 解決済みアイデンティティ
///
/// Identity サービスがユーザーの存在を確認した結果。
/// 存在しないユーザーはこの型にならない（リゾルバが `None` を返す）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    user_id: UserId,
    email:   Option<String>,
}

impl ResolvedIdentity {
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// 登録されているメールアドレス
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// 通知の宛先アドレスを返す
    ///
    /// メールアドレスが未登録の場合は空文字列を返す。
    /// 空の宛先は事前検証せず、そのまま配信プロバイダに渡す（拒否はプロバイダ側で起きる）。
    pub fn contact_address(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn user_idは任意の文字列を保持する() {
        let sut = UserId::new("u1").unwrap();

        assert_eq!(sut.as_str(), "u1");
        assert_eq!(sut.to_string(), "u1");
    }

    #[test]
    fn user_idは空文字列を拒否する() {
        let result = UserId::new("");

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[rstest]
    #[case("   ")]
    #[case("\t\n")]
    #[case(" u1 ")]
    fn user_idは空白を含む値をそのまま保持する(#[case] input: &str) {
        let sut = UserId::new(input).unwrap();

        assert_eq!(sut.as_str(), input);
    }

    #[test]
    fn contact_addressはメールアドレスを返す() {
        let identity = ResolvedIdentity::new(
            UserId::new("u1").unwrap(),
            Some("a@x.com".to_string()),
        );

        assert_eq!(identity.contact_address(), "a@x.com");
        assert_eq!(identity.email(), Some("a@x.com"));
    }

    #[test]
    fn contact_addressはメール未登録なら空文字列を返す() {
        let identity = ResolvedIdentity::new(UserId::new("u1").unwrap(), None);

        assert_eq!(identity.contact_address(), "");
        assert_eq!(identity.email(), None);
    }
}
