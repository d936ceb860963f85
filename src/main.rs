#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use std::{path::Path, sync::Arc};

use clap::Parser;
use tokio::net::TcpListener;

use leftover_chef::{
    build_app,
    config::{Cli, Commands, Config},
    image_io::ingest_path,
    llm::create_provider,
    logging::init_logging,
    models::AppState,
    recipe_service::RecipeService,
    session::{self, Session},
    views::recipe_as_text,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    // Keep guard alive so file logger flushes correctly
    let _log_guards = init_logging(&config);
    log_config(&config);

    let provider = create_provider(&config)?;
    let service = Arc::new(RecipeService::new(
        provider,
        config.prompt_template(),
        config.language,
    )?);

    if let Some(command) = cli.command {
        return handle_command(command, &service).await;
    }

    let state = AppState {
        service,
        config: config.clone(),
    };
    let app = build_app(state);

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!("listening on http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

fn log_config(config: &Config) {
    tracing::info!("=== Configuration ===");
    tracing::info!("Bind address: {}", config.bind);
    tracing::info!("Log file: {}", config.log_file.display());
    tracing::info!(
        "CORS origin: {}",
        config.cors_origin.as_deref().unwrap_or("<allow all>")
    );
    tracing::info!("Max upload: {} bytes", config.max_upload_bytes);
    tracing::info!("LLM provider: {:?}", config.llm_provider);
    tracing::info!("LLM API key: {}", config.llm_api_key_masked());
    tracing::info!("LLM model: {}", config.llm_model());
    tracing::info!("LLM API URL: {}", config.llm_api_base());
    tracing::info!("LLM timeout: {}s", config.llm_timeout_secs);
    tracing::info!("Language: {}", config.language);
    tracing::info!(
        "System prompt: {}",
        config
            .system_prompt
            .as_ref()
            .map_or_else(|| "<built-in>".to_string(), |p| format!("{} chars", p.len()))
    );
    tracing::info!("====================");
}

async fn handle_command(command: Commands, service: &RecipeService) -> anyhow::Result<()> {
    match command {
        Commands::Generate { path } => generate_from_file(&path, service).await,
    }
}

async fn generate_from_file(path: &Path, service: &RecipeService) -> anyhow::Result<()> {
    let strings = service.language().strings();
    let image = ingest_path(path).await?;

    match session::cook(service, image, strings).await {
        Session::Success { recipe, .. } => {
            print!("{}", recipe_as_text(&recipe, strings));
            Ok(())
        }
        Session::Error { message } => anyhow::bail!(message),
        _ => anyhow::bail!("generation did not finish"),
    }
}
