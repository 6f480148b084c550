//! Storefront service entry point.

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::{auth::JwtKeys, config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("NATS unavailable, order events disabled: {e}");
                None
            }
        },
        None => None,
    };

    let state = AppState {
        db,
        jwt: JwtKeys::new(&config.jwt_secret),
        nats,
    };
    let app = routes::router(state);

    tracing::info!("storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(
        tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?,
        app,
    )
    .await?;
    Ok(())
}
