//! # Trainbell インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートは外部サービス（Identity サービス、メール配信プロバイダ）への
//! アクセスを trait の背後に隠し、具体的な実装を提供する。
//! ユースケース層は trait にのみ依存し、実装は起動時に差し込まれる。
//!
//! ## 責務
//!
//! - **ユーザー解決**: Supabase Auth 管理 API によるユーザー ID → メールアドレスの解決
//! - **メール送信**: Resend / SMTP の送信実装
//!
//! ## 依存関係
//!
//! ```text
//! webhook-service → infra → domain
//!         ↘
//!           shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`identity`] - ユーザー解決
//! - [`notification`] - メール送信
//! - `mock` - テスト用モック（`test-utils` feature）

pub mod error;
pub mod identity;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod notification;

pub use error::{InfraError, InfraErrorKind};
