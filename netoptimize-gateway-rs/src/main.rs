// netoptimize-gateway-rs/src/main.rs
// NetOptimize AI Backend - HTTP entry point
// Port 8000 by default (NETOPTIMIZE_SERVICE_PORT / NETOPTIMIZE_SERVICE_ADDR)
//
// Startup order:
// - load .env (it may set RUST_LOG), initialize tracing, then report the .env outcome
// - read configuration; a missing GOOGLE_API_KEY aborts before the listener is bound
// - build the Gemini client once and share it with every handler

use std::sync::Arc;

use netoptimize_gateway::config::GatewayConfig;
use netoptimize_gateway::error::GatewayError;
use netoptimize_gateway::llm_client::GeminiClient;
use netoptimize_gateway::{create_router, AppState};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = config_rs::load_dotenv();
    init_tracing();

    match dotenv {
        Ok(Some(path)) => tracing::debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(err) => tracing::warn!("{}", err),
    }

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            let err = GatewayError::from(err);
            tracing::error!("{}", err);
            return Err(err.into());
        }
    };
    tracing::info!("Loaded configuration: {:?}", config);

    let client = GeminiClient::new(&config).map_err(GatewayError::from)?;
    tracing::info!("Using Gemini model: {}", client.model());

    let app = create_router(AppState::new(Arc::new(client)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("NetOptimize AI Backend starting on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
