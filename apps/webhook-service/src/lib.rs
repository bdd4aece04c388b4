//! # Webhook Service ライブラリ
//!
//! トレーニングプロバイダからの Webhook を受け、ユーザーに結果メールを送るサービス。
//! 統合テスト用にルーター構築とユースケースを公開する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
