use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use concilium::api::server::start_api_server;
use concilium::api::types::ApiContext;
use concilium::config;
use concilium::consult::gateway::OpenAiClient;
use concilium::store::MemStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let ctx = ApiContext::new(
        Arc::new(MemStore::new()),
        Arc::new(OpenAiClient::from_config()),
    );

    let mut server = start_api_server(ctx, config::bind_addr()).await?;
    tracing::info!(addr = %server.addr, "Consultation API listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    server.shutdown();

    Ok(())
}
