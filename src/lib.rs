//! Taskbrief - task list CLI library
//!
//! This library provides the core functionality for Taskbrief: a live
//! task store, flow wrappers for AI-assisted update briefs, and the
//! application controller that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: Task record store with a live snapshot feed
//! - `providers`: Generation provider abstraction and implementations (Ollama, OpenAI-compatible)
//! - `flows`: Schema-validated request/response wrappers around generation calls
//! - `controller`: Application state controller bridging intents to the store and flows
//! - `session`: Interactive terminal session
//! - `notice`: Transient user-facing notices
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use taskbrief::{AppController, SqliteTaskStore};
//! use taskbrief::notice;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(SqliteTaskStore::new()?);
//!     let (tx, _rx) = notice::channel();
//!
//!     let controller = AppController::new(store, tx);
//!     controller.spawn_subscription();
//!     controller.add_task("Write the weekly update").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod flows;
pub mod notice;
pub mod providers;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use controller::AppController;
pub use error::{Result, TaskbriefError};
pub use notice::{Notice, NoticeLevel};
pub use store::{SqliteTaskStore, Task, TaskSnapshot, TaskStore};
