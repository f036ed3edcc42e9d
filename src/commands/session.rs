//! Interactive session command

use crate::config::Config;
use crate::controller::AppController;
use crate::error::Result;
use crate::notice::{self, Notice};
use crate::providers;
use crate::session;
use crate::store::SqliteTaskStore;
use std::sync::Arc;

/// Open the store, wire up the controller, and run the REPL
///
/// A generator that cannot be constructed (missing credentials, bad
/// provider type override) downgrades to a warning: task operations
/// still work, only the brief action reports the missing provider.
pub async fn run_session(
    config: Config,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let store = Arc::new(SqliteTaskStore::from_config(&config.store)?);
    let (tx, rx) = notice::channel();

    let mut controller = AppController::new(store, tx.clone());
    match providers::create_generator_with_override(
        &config.provider,
        provider.as_deref(),
        model.as_deref(),
    ) {
        Ok(generator) => {
            controller = controller.with_generator(generator);
        }
        Err(e) => {
            tracing::warn!("Generator unavailable: {}", e);
            let _ = tx.send(
                Notice::error("AI provider unavailable").with_description(
                    "Task commands still work; 'brief' needs a configured provider.",
                ),
            );
        }
    }

    let controller = Arc::new(controller);
    controller.spawn_subscription();

    session::run(controller, rx).await
}
