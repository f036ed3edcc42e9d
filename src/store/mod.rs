//! Task record store for Taskbrief
//!
//! The store owns the persisted task collection and is the single source
//! of truth for every view of it. Each mutation recomputes the full
//! ordered snapshot and publishes it wholesale on a watch channel;
//! consumers mirror the latest snapshot instead of patching local state.

use crate::error::{Result, TaskbriefError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

pub mod types;
pub use types::{validate_task_text, Task, TaskSnapshot, TaskTextError, MAX_TASK_TEXT_LEN};

/// Storage backend for the task collection
///
/// Implementations assign ids and creation timestamps, apply targeted
/// partial updates, and publish a full ordered snapshot after every
/// change. Display order is always incomplete-before-complete, then
/// newest-created first within each group.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task with a store-assigned id and creation time
    ///
    /// The new task starts out not completed.
    async fn add(&self, text: &str) -> Result<Task>;

    /// Set a task's completion state
    ///
    /// # Errors
    ///
    /// Returns error if no task with the given id exists
    async fn set_completed(&self, id: &str, completed: bool) -> Result<()>;

    /// Replace a task's description text
    ///
    /// # Errors
    ///
    /// Returns error if no task with the given id exists
    async fn update_text(&self, id: &str, text: &str) -> Result<()>;

    /// Delete a task by id
    ///
    /// # Errors
    ///
    /// Returns error if no task with the given id exists
    async fn remove(&self, id: &str) -> Result<()>;

    /// Subscribe to the live snapshot feed
    ///
    /// The receiver holds the current snapshot immediately; later
    /// publishes replace it. Intermediate snapshots may be coalesced,
    /// which is safe because every snapshot is a complete view.
    fn subscribe(&self) -> watch::Receiver<TaskSnapshot>;
}

/// SQLite-backed task store
///
/// Mutations and snapshot publishing are serialized through an internal
/// lock, so subscribers always observe snapshots in mutation order.
pub struct SqliteTaskStore {
    db_path: PathBuf,
    feed: watch::Sender<TaskSnapshot>,
    seq: AtomicU64,
    write_lock: Mutex<()>,
}

impl SqliteTaskStore {
    /// Create a store in the user's data directory
    ///
    /// The `TASKBRIEF_TASKS_DB` environment variable overrides the
    /// location, which makes it easy to point the binary at a test DB
    /// or alternate file without changing the application data dir.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("TASKBRIEF_TASKS_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "taskbrief", "taskbrief")
            .ok_or_else(|| TaskbriefError::Store("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        Self::new_with_path(data_dir.join("tasks.db"))
    }

    /// Create a store that uses the specified database path
    ///
    /// This is primarily useful for tests where the default application
    /// data directory is not desirable (for example, a temporary
    /// directory).
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists so opening the DB file succeeds.
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| TaskbriefError::Store(e.to_string()))?;
        }

        let store = Self {
            db_path,
            feed: watch::channel(TaskSnapshot::default()).0,
            seq: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        };

        store.init()?;

        // Seed the feed with the persisted state so subscribers see the
        // current collection immediately.
        let tasks = store.load_ordered()?;
        store.feed.send_replace(TaskSnapshot { tasks, seq: 0 });

        Ok(store)
    }

    /// Create a store from configuration
    ///
    /// Resolution order: `TASKBRIEF_TASKS_DB` environment variable, then
    /// the configured path, then the default data directory.
    pub fn from_config(config: &crate::config::StoreConfig) -> Result<Self> {
        if std::env::var("TASKBRIEF_TASKS_DB").is_ok() {
            return Self::new();
        }
        match &config.db_path {
            Some(path) => Self::new_with_path(path),
            None => Self::new(),
        }
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                completed INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| TaskbriefError::Store(e.to_string()).into())
    }

    /// Load every task in display order
    ///
    /// Timestamps are stored as fixed-precision RFC 3339 strings, so the
    /// lexicographic `created_at` ordering below is chronological.
    fn load_ordered(&self) -> Result<Vec<Task>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, text, completed, created_at FROM tasks
                ORDER BY completed ASC, created_at DESC, id ASC",
            )
            .context("Failed to prepare snapshot query")
            .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let text: String = row.get(1)?;
                let completed: bool = row.get(2)?;
                let created_at_str: String = row.get(3)?;

                let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()); // Fallback if parsing fails

                Ok(Task {
                    id,
                    text,
                    completed,
                    created_at,
                })
            })
            .context("Failed to query tasks")
            .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(
                row.context("Failed to read task row")
                    .map_err(|e| TaskbriefError::Store(e.to_string()))?,
            );
        }

        Ok(tasks)
    }

    /// Recompute and publish the current snapshot
    ///
    /// Callers must hold the write lock.
    fn publish(&self) -> Result<()> {
        let tasks = self.load_ordered()?;
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(seq, tasks = tasks.len(), "publishing task snapshot");
        self.feed.send_replace(TaskSnapshot { tasks, seq });
        Ok(())
    }

    fn lock_writes(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| TaskbriefError::Store("Write lock poisoned".into()).into())
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn add(&self, text: &str) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        };

        let _guard = self.lock_writes()?;
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO tasks (id, text, completed, created_at) VALUES (?, ?, ?, ?)",
            params![
                task.id,
                task.text,
                task.completed,
                task.created_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )
        .context("Failed to insert task")
        .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        self.publish()?;
        Ok(task)
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<()> {
        let _guard = self.lock_writes()?;
        let conn = self.open()?;
        let changed = conn
            .execute(
                "UPDATE tasks SET completed = ? WHERE id = ?",
                params![completed, id],
            )
            .context("Failed to update task status")
            .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        if changed == 0 {
            return Err(TaskbriefError::Store(format!("No task with id {}", id)).into());
        }

        self.publish()
    }

    async fn update_text(&self, id: &str, text: &str) -> Result<()> {
        let _guard = self.lock_writes()?;
        let conn = self.open()?;
        let changed = conn
            .execute("UPDATE tasks SET text = ? WHERE id = ?", params![text, id])
            .context("Failed to update task text")
            .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        if changed == 0 {
            return Err(TaskbriefError::Store(format!("No task with id {}", id)).into());
        }

        self.publish()
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.lock_writes()?;
        let conn = self.open()?;
        let changed = conn
            .execute("DELETE FROM tasks WHERE id = ?", params![id])
            .context("Failed to delete task")
            .map_err(|e| TaskbriefError::Store(e.to_string()))?;

        if changed == 0 {
            return Err(TaskbriefError::Store(format!("No task with id {}", id)).into());
        }

        self.publish()
    }

    fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.feed.subscribe()
    }
}
