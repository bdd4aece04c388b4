//! # トレーニング結果
//!
//! トレーニングプロバイダが Webhook の `result.status` で報告するジョブ結果を分類する。
//!
//! ## 分類
//!
//! | `result.status` | [`TrainingOutcome`] | 送信する通知 |
//! |-----------------|---------------------|--------------|
//! | `"finished"` | `Finished` | トレーニング成功メール |
//! | `"failed"` | `Failed` | トレーニング失敗メール |
//! | その他・欠落・文字列以外 | `Other` | なし |
//!
//! 各分類は高々 1 通の通知にしか対応しない。`Finished` で失敗メールを
//! 続けて送ることはない（分岐は互いに独立している）。

use strum::IntoStaticStr;

use crate::notification::NotificationTemplate;

/// トレーニングジョブの結果分類
///
/// リクエストごとに 1 回だけ計算され、保存はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TrainingOutcome {
    /// トレーニング成功
    Finished,
    /// トレーニング失敗
    Failed,
    /// 未知のステータス（ステータス欠落を含む）
    Other,
}

impl TrainingOutcome {
    /// `result.status` の値から結果を分類する
    ///
    /// 比較は完全一致（大文字小文字を区別する）。
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("finished") => Self::Finished,
            Some("failed") => Self::Failed,
            _ => Self::Other,
        }
    }

    /// この結果に対応する通知テンプレートを返す
    ///
    /// `Other` は通知対象外のため `None`。
    pub fn notification_template(&self) -> Option<NotificationTemplate> {
        match self {
            Self::Finished => Some(NotificationTemplate::TrainingSucceeded),
            Self::Failed => Some(NotificationTemplate::TrainingFailed),
            Self::Other => None,
        }
    }
}
