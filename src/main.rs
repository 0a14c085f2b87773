use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use tutor_backend::config::Config;
use tutor_backend::routes;
use tutor_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set. The app will run but chat requests will fail.");
    }

    let state = Arc::new(AppState::new(&config)?);

    let cors = CorsLayer::very_permissive();
    let app = routes::create_router().with_state(state).layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("tutor backend running at http://localhost:{}", config.port);
    axum::serve(listener, app)
        .await
        .context("server exited with an error")?;

    Ok(())
}
