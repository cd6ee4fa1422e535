use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pantry_recipes::config::{ExtractionConfig, GenerationConfig, ServerConfig};
use pantry_recipes::generation::OpenAiRecipeClient;
use pantry_recipes::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging; `log` macro records are captured as well
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting pantry recipe suggestion service");

    let server_config = ServerConfig::from_env()?;
    let generation_config = GenerationConfig::from_env()?;

    info!(
        model = %generation_config.model,
        base_url = %generation_config.base_url,
        "Recipe generation client configured"
    );

    let generator = OpenAiRecipeClient::new(generation_config)?;

    let state = AppState {
        generator: Arc::new(generator),
        extraction: ExtractionConfig::default(),
    };

    server::serve(server_config, state).await
}
