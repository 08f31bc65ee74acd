use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use luxvane_admin::{app::build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully ({:?})", config.app_env);

    if config.jwt_secret.is_none() {
        tracing::warn!("⚠️ JWT_SECRET not set, owner login will fail");
    }
    if config.google_api_key.is_none() {
        tracing::warn!("⚠️ GOOGLE_API_KEY not set, description generation is unavailable");
    }

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let app = build_router(state)?;

    let addr = config.bind_addr;
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
