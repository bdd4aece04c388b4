//! # Webhook Service 設定
//!
//! 環境変数から Webhook Service の設定を読み込む。
//!
//! 起動時に一度だけ読み込み、以降は読み取り専用で共有する。
//! 空文字列の環境変数は未設定として扱う。

use std::{env, fmt, time::Duration};

use secrecy::SecretString;
use thiserror::Error;
use trainbell_infra::identity::ServiceRoleKey;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("{name} の値が不正です: {value}（{reason}）")]
    Invalid {
        name:   &'static str,
        value:  String,
        reason: String,
    },
}

/// Webhook Service の設定
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// バインドアドレス
    pub host:             String,
    /// ポート番号
    pub port:             u16,
    /// Supabase プロジェクトの URL
    pub supabase_url:     String,
    /// Supabase の service-role キー
    pub service_role_key: ServiceRoleKey,
    /// Resend の API キー
    pub resend_api_key:   SecretString,
    /// 外部サービス呼び出しのタイムアウト（未設定なら無制限）
    pub outbound_timeout: Option<Duration>,
    /// 通知設定
    pub notification:     NotificationConfig,
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationBackend {
    /// Resend HTTP API（本番）
    Resend,
    /// SMTP（Mailpit 等）
    Smtp,
}

impl NotificationBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "resend" => Some(Self::Resend),
            "smtp" => Some(Self::Smtp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resend => "resend",
            Self::Smtp => "smtp",
        }
    }
}

impl fmt::Display for NotificationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `resend`: Resend HTTP API 経由で送信（デフォルト）
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend:        NotificationBackend,
    /// 送信元メールアドレス（固定）
    pub from_address:   String,
    /// Resend API のベース URL
    pub resend_api_url: String,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:      String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:      u16,
}

impl WebhookConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    ///
    /// `lookup` が `None` または空文字列を返したキーは未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars { lookup };

        let supabase_url = vars.required("SUPABASE_URL")?;
        validate_url("SUPABASE_URL", &supabase_url)?;

        let outbound_timeout = vars
            .parsed::<u64>("OUTBOUND_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        Ok(Self {
            host: vars.or_default("WEBHOOK_HOST", "0.0.0.0"),
            port: vars.parsed("WEBHOOK_PORT")?.unwrap_or(3000),
            supabase_url,
            service_role_key: ServiceRoleKey::new(vars.required("SUPABASE_SERVICE_ROLE_KEY")?),
            resend_api_key: SecretString::from(vars.required("RESEND_API_KEY")?),
            outbound_timeout,
            notification: NotificationConfig::from_vars(&vars)?,
        })
    }
}

impl NotificationConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match vars.optional("NOTIFICATION_BACKEND") {
            Some(value) => {
                NotificationBackend::parse(&value).ok_or_else(|| ConfigError::Invalid {
                    name:   "NOTIFICATION_BACKEND",
                    value,
                    reason: "resend / smtp のいずれかを指定してください".to_string(),
                })?
            }
            None => NotificationBackend::Resend,
        };

        let resend_api_url = vars.or_default("RESEND_API_URL", "https://api.resend.com");
        validate_url("RESEND_API_URL", &resend_api_url)?;

        Ok(Self {
            backend,
            from_address: vars.or_default("NOTIFICATION_FROM_ADDRESS", "noreply@headshots.tryleap.ai"),
            resend_api_url,
            smtp_host: vars.or_default("SMTP_HOST", "localhost"),
            smtp_port: vars.parsed("SMTP_PORT")?.unwrap_or(1025),
        })
    }
}

/// 環境変数の参照ヘルパー
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        self.optional(name)
            .map(|value| {
                value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                    name,
                    reason: e.to_string(),
                    value,
                })
            })
            .transpose()
    }
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
