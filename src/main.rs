//! Taskbrief - task list CLI with AI-assisted update briefs
//!
#![doc = "Taskbrief - task list CLI with AI-assisted update briefs"]
#![doc = "Main entry point for the taskbrief application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskbrief::cli::{Cli, Commands};
use taskbrief::commands;
use taskbrief::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // If the user supplied a store path on the CLI, mirror it into
    // TASKBRIEF_TASKS_DB so the store initializer can pick it up. This
    // keeps callers unchanged while allowing `SqliteTaskStore::new()` to
    // honor an override.
    if let Some(store_path) = &cli.store_path {
        std::env::set_var("TASKBRIEF_TASKS_DB", store_path);
        tracing::info!("Using store DB override from CLI: {}", store_path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Session { provider, model } => {
            tracing::info!("Starting interactive session");
            commands::session::run_session(config, provider, model).await
        }
        Commands::Add { text } => commands::tasks::add_task(&config, &text).await,
        Commands::List { json } => commands::tasks::list_tasks(&config, json).await,
        Commands::Done { selector } => commands::tasks::toggle_task(&config, &selector).await,
        Commands::Rm { selector } => commands::tasks::delete_task(&config, &selector).await,
        Commands::Edit { selector, text } => {
            commands::tasks::edit_task(&config, &selector, &text).await
        }
        Commands::Brief { provider, model } => {
            tracing::info!("Generating update brief");
            commands::brief::run_brief(&config, provider.as_deref(), model.as_deref()).await
        }
        Commands::Relevance {
            text,
            provider,
            model,
        } => {
            commands::brief::run_relevance(&config, &text, provider.as_deref(), model.as_deref())
                .await
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskbrief=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
