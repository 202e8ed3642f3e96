use std::sync::Arc;

use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use blindbox::config::AppConfig;
use blindbox::infra::mail::SmtpMailer;
use blindbox::router::build_router;
use blindbox::state::AppState;
use blindbox_core::config::Config;
use blindbox_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .context("failed to create Redis pool")?;

    let mailer = SmtpMailer::new(&config).context("invalid SMTP configuration")?;

    let state = AppState {
        db,
        redis,
        mailer: Arc::new(mailer),
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.app_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("blindbox listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
