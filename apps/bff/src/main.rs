//! # VitalSync BFF サーバー
//!
//! モバイルクライアントの代わりに上流ヘルスサービスへログインし、
//! 日次のヘルスデータを1つのレポートにまとめて返す。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Mobile    │────▶│     BFF      │────▶│   Upstream   │
//! │    Client    │     │  port: 5002  │     │ Health API   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │   Session    │
//!                      │ Cache (mem)  │
//!                      └──────────────┘
//! ```
//!
//! 環境変数は [`vitalsync_bff::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! UPSTREAM_URL=https://health.example.com cargo run -p vitalsync-bff
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use tokio::net::TcpListener;
use vitalsync_bff::{app_builder::build_app, client::HttpUpstreamClient, config::BffConfig};
use vitalsync_domain::clock::{Clock, SystemClock};
use vitalsync_infra::{CredentialKeyDeriver, SessionManager};
use vitalsync_shared::observability::TracingConfig;

/// BFF サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 上流クライアントとセッションマネージャの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("bff");
    vitalsync_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "bff").entered();

    let config = BffConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!("BFF サーバーを起動します: {}:{}", config.host, config.port);

    let http_client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .context("HTTP クライアントの構築に失敗しました")?;
    let upstream = Arc::new(HttpUpstreamClient::new(
        &config.upstream_url,
        http_client,
        config.retry,
    ));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let key_deriver =
        CredentialKeyDeriver::new().context("認証情報キーの導出器を初期化できませんでした")?;
    let session_manager = Arc::new(SessionManager::new(
        upstream,
        clock.clone(),
        key_deriver,
        config.session_cache,
    ));

    let app = build_app(session_manager, clock);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("BFF サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
