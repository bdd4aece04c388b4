//! # Webhook Service サーバー
//!
//! トレーニングプロバイダからの完了/失敗通知を受け、ユーザーに結果メールを送る。
//!
//! ## 処理の流れ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Training    │────▶│   Webhook    │────▶│ Supabase Auth│
//! │  Provider    │     │   Service    │     └──────────────┘
//! └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │    Resend    │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `SUPABASE_URL` | **Yes** | Supabase プロジェクトの URL |
//! | `SUPABASE_SERVICE_ROLE_KEY` | **Yes** | service-role キー |
//! | `RESEND_API_KEY` | **Yes** | Resend API キー |
//! | `WEBHOOK_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WEBHOOK_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `NOTIFICATION_BACKEND` | No | `resend` / `smtp`（デフォルト: `resend`） |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元アドレス |
//! | `RESEND_API_URL` | No | Resend API のベース URL |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP バックエンドの接続先 |
//! | `OUTBOUND_TIMEOUT_SECS` | No | 外部呼び出しのタイムアウト秒数（未設定なら無制限） |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p trainbell-webhook-service
//!
//! # ローカル SMTP（Mailpit）に送る
//! NOTIFICATION_BACKEND=smtp cargo run -p trainbell-webhook-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tokio::net::TcpListener;
use trainbell_infra::identity::{IdentityResolver, SupabaseIdentityResolver};
use trainbell_shared::observability::{TracingConfig, init_tracing};
use trainbell_webhook_service::{
    app_builder::{build_router, create_notification_sender},
    config::WebhookConfig,
    handler::WebhookState,
    usecase::{TemplateRenderer, TrainingWebhookUseCaseImpl},
};

/// Webhook Service のエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込みと検証
/// 4. 外部サービスクライアントの初期化
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("webhook-service");
    init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "webhook-service").entered();

    // 設定読み込み（必須項目が欠けていれば起動しない）
    let config = WebhookConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Webhook Service を起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存コンポーネントを初期化
    let identity_resolver: Arc<dyn IdentityResolver> = Arc::new(
        SupabaseIdentityResolver::new(
            &config.supabase_url,
            config.service_role_key.clone(),
            config.outbound_timeout,
        )
        .context("Identity サービスクライアントの初期化に失敗しました")?,
    );
    let notification_sender = create_notification_sender(&config)
        .context("通知バックエンドの初期化に失敗しました")?;
    let template_renderer =
        TemplateRenderer::new().context("メールテンプレートの読み込みに失敗しました")?;

    let usecase = TrainingWebhookUseCaseImpl::new(
        identity_resolver,
        notification_sender,
        template_renderer,
        config.notification.from_address.clone(),
    );
    let state = Arc::new(WebhookState {
        usecase: Arc::new(usecase),
    });

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Webhook Service が起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Webhook Service を停止しました");
    Ok(())
}

/// Ctrl-C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl-C ハンドラの登録に失敗しました: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM ハンドラの登録に失敗しました: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
