//! # ドメイン層エラー定義
//!
//! 入力値がドメインの前提を満たさない場合のエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//!
//! ## 使用例
//!
//! ```rust
//! use trainbell_domain::DomainError;
//!
//! fn validate_user_id(value: &str) -> Result<(), DomainError> {
//!     if value.is_empty() {
//!         return Err(DomainError::Validation("user_id は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がドメインの前提に違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - クエリパラメータ `user_id` が空
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
