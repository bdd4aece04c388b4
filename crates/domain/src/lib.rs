//! # Trainbell ドメイン層
//!
//! トレーニング完了通知ブリッジのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **永続化しない**: すべての値は 1 回の Webhook 呼び出しの中で生成・破棄される
//! - **外部システム非依存**: Identity サービスやメール配信プロバイダの詳細は infra 層に閉じ込める
//! - **閉じた分類**: ジョブ結果は enum で表現し、パターンマッチで網羅的に扱う
//!
//! ## 依存関係の方向
//!
//! ```text
//! webhook-service → infra → domain
//!          ↘                  ↑
//!            shared ──────────┘（依存なし）
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - ユーザー識別子と解決済みアイデンティティ
//! - [`training`] - トレーニングジョブ結果の分類
//! - [`notification`] - 通知メールのテンプレート種別とメッセージ
//!
//! ## 使用例
//!
//! ```rust
//! use trainbell_domain::{training::TrainingOutcome, user::UserId};
//!
//! let user_id = UserId::new("8f14e45f-ceea-467f-a8b1-3b5c2f9d7a10").unwrap();
//! let outcome = TrainingOutcome::classify(Some("failed"));
//!
//! assert_eq!(user_id.as_str(), "8f14e45f-ceea-467f-a8b1-3b5c2f9d7a10");
//! assert_eq!(outcome, TrainingOutcome::Failed);
//! ```

pub mod error;
pub mod notification;
pub mod training;
pub mod user;

pub use error::DomainError;
