//! Brief and relevance commands

use crate::config::Config;
use crate::controller::AppController;
use crate::error::Result;
use crate::notice;
use crate::providers;
use crate::store::SqliteTaskStore;
use colored::Colorize;
use std::sync::Arc;

/// Handle `taskbrief brief`
///
/// Summarizes pending tasks into an update brief and prints it. With no
/// pending tasks this performs no generation call at all.
pub async fn run_brief(
    config: &Config,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<()> {
    let (controller, mut notices) = open_controller(config, provider, model).await?;

    let result = controller.summarize().await;
    notice::drain(&mut notices);

    if let Ok(Some(summary)) = &result {
        println!();
        println!("{}", "Update brief".bold().underline());
        println!("{}", summary);
    }

    result.map(|_| ())
}

/// Handle `taskbrief relevance <text>`
///
/// Evaluates one candidate task against the current list and prints the
/// verdict with its justification.
pub async fn run_relevance(
    config: &Config,
    text: &str,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<()> {
    let (controller, mut notices) = open_controller(config, provider, model).await?;

    let result = controller.check_relevance(text).await;
    notice::drain(&mut notices);

    let verdict = result?;
    let tag = if verdict.is_relevant {
        "relevant".green()
    } else {
        "not relevant".yellow()
    };
    println!("{}: {}", tag, verdict.reason);

    Ok(())
}

async fn open_controller(
    config: &Config,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<(Arc<AppController>, notice::NoticeReceiver)> {
    let store = Arc::new(SqliteTaskStore::from_config(&config.store)?);
    let generator =
        providers::create_generator_with_override(&config.provider, provider, model)?;
    let (tx, rx) = notice::channel();

    let controller = Arc::new(AppController::new(store, tx).with_generator(generator));
    controller.spawn_subscription();
    while controller.is_loading() {
        tokio::task::yield_now().await;
    }

    Ok((controller, rx))
}
