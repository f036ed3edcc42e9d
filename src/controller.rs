//! Application state controller
//!
//! Bridges user intents to the task store and the flow layer, and keeps
//! a local mirror consistent with the store's live snapshot feed. The
//! subscription loop is the mirror's only writer; intent handlers only
//! ever issue store requests and wait for the canonical state to come
//! back through the feed. Failures surface as transient notices and are
//! never fatal.

use crate::error::{Result, TaskbriefError};
use crate::flows::{self, FlowError, RelevanceInput, RelevanceOutput, SummarizeInput};
use crate::notice::{Notice, NoticeSender};
use crate::providers::Generator;
use crate::store::{validate_task_text, Task, TaskSnapshot, TaskStore};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Orchestrates the task mirror, store mutations, and flow runs
pub struct AppController {
    store: Arc<dyn TaskStore>,
    generator: Option<Arc<dyn Generator>>,
    notices: NoticeSender,
    mirror: Arc<RwLock<TaskSnapshot>>,
    loading: Arc<AtomicBool>,
    in_flight: Mutex<HashSet<String>>,
    summarizing: AtomicBool,
    summary: RwLock<Option<String>>,
}

impl AppController {
    /// Create a controller over the given store
    ///
    /// The controller starts in the loading state until the first
    /// snapshot arrives; call [`Self::spawn_subscription`] to start the
    /// mirror loop. Without a generator, task operations work but the
    /// summarize and relevance actions report a configuration error.
    pub fn new(store: Arc<dyn TaskStore>, notices: NoticeSender) -> Self {
        Self {
            store,
            generator: None,
            notices,
            mirror: Arc::new(RwLock::new(TaskSnapshot::default())),
            loading: Arc::new(AtomicBool::new(true)),
            in_flight: Mutex::new(HashSet::new()),
            summarizing: AtomicBool::new(false),
            summary: RwLock::new(None),
        }
    }

    /// Attach a generator handle for the flow actions
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Start the subscription loop that mirrors store snapshots
    ///
    /// Every published snapshot replaces the mirror wholesale. The
    /// loading flag clears on the first snapshot. If the feed closes,
    /// the failure is logged, surfaced as a one-shot notice, and the
    /// loading flag is cleared so no surface hangs waiting for it.
    pub fn spawn_subscription(&self) -> tokio::task::JoinHandle<()> {
        let mut feed = self.store.subscribe();
        let mirror = Arc::clone(&self.mirror);
        let loading = Arc::clone(&self.loading);
        let notices = self.notices.clone();

        tokio::spawn(async move {
            loop {
                let snapshot = feed.borrow_and_update().clone();
                tracing::debug!(
                    seq = snapshot.seq,
                    tasks = snapshot.tasks.len(),
                    "mirroring store snapshot"
                );
                if let Ok(mut guard) = mirror.write() {
                    *guard = snapshot;
                }
                loading.store(false, Ordering::SeqCst);

                if feed.changed().await.is_err() {
                    tracing::error!("task snapshot feed closed");
                    let _ = notices.send(
                        Notice::error("Live task feed disconnected")
                            .with_description("Task changes will no longer be reflected."),
                    );
                    loading.store(false, Ordering::SeqCst);
                    break;
                }
            }
        })
    }

    /// Whether the first snapshot is still outstanding
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Current mirrored tasks, in display order
    pub fn tasks(&self) -> Vec<Task> {
        self.mirror
            .read()
            .map(|snapshot| snapshot.tasks.clone())
            .unwrap_or_default()
    }

    /// Current mirrored snapshot
    pub fn snapshot(&self) -> TaskSnapshot {
        self.mirror
            .read()
            .map(|snapshot| snapshot.clone())
            .unwrap_or_default()
    }

    /// The most recently generated summary, if any
    pub fn summary(&self) -> Option<String> {
        self.summary.read().ok().and_then(|guard| guard.clone())
    }

    /// Whether a summarize action is currently in flight
    pub fn is_summarizing(&self) -> bool {
        self.summarizing.load(Ordering::SeqCst)
    }

    /// Add a task after validating its text at the form boundary
    ///
    /// On validation failure nothing is sent to the store. The mirror is
    /// never mutated here; the new task appears when the store publishes
    /// its next snapshot.
    pub async fn add_task(&self, text: &str) -> Result<()> {
        if let Err(e) = validate_task_text(text) {
            let _ = self
                .notices
                .send(Notice::error("Task not added").with_description(e.to_string()));
            return Err(e.into());
        }

        let text = text.trim();
        match self.store.add(text).await {
            Ok(task) => {
                let _ = self.notices.send(
                    Notice::success("Task added")
                        .with_description(format!("\"{}\" has been added to your list.", task.text)),
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to add task: {}", e);
                let _ = self.notices.send(
                    Notice::error("Could not add task")
                        .with_description("The task was not saved to the store."),
                );
                Err(e)
            }
        }
    }

    /// Flip a task's completion state
    ///
    /// Reads the current state from the mirror; an id the mirror does
    /// not know is a no-op. A toggle or delete already in flight for the
    /// same id causes this intent to be dropped.
    pub async fn toggle_task(&self, id: &str) -> Result<()> {
        let completed = self
            .mirror
            .read()
            .ok()
            .and_then(|snapshot| {
                snapshot
                    .tasks
                    .iter()
                    .find(|task| task.id == id)
                    .map(|task| task.completed)
            });

        let completed = match completed {
            Some(completed) => completed,
            None => {
                tracing::debug!(id, "toggle for unknown task id, ignoring");
                return Ok(());
            }
        };

        if !self.begin_mutation(id) {
            tracing::debug!(id, "mutation already in flight, dropping toggle");
            return Ok(());
        }
        let result = self.store.set_completed(id, !completed).await;
        self.end_mutation(id);

        if let Err(e) = result {
            tracing::error!("Failed to update task: {}", e);
            let _ = self.notices.send(
                Notice::error("Could not update task")
                    .with_description("The task's status was not changed."),
            );
            return Err(e);
        }
        Ok(())
    }

    /// Delete a task by id
    ///
    /// No confirmation step and no undo. Shares the per-id in-flight
    /// guard with toggle.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        if !self.begin_mutation(id) {
            tracing::debug!(id, "mutation already in flight, dropping delete");
            return Ok(());
        }
        let result = self.store.remove(id).await;
        self.end_mutation(id);

        match result {
            Ok(()) => {
                let _ = self.notices.send(Notice::info("Task deleted"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to delete task: {}", e);
                let _ = self.notices.send(
                    Notice::error("Could not delete task")
                        .with_description("The task is still on your list."),
                );
                Err(e)
            }
        }
    }

    /// Replace a task's text after validating it
    ///
    /// Reports the outcome to the caller: an editing surface should stay
    /// open when this returns an error, since the previous text is still
    /// in place.
    pub async fn edit_task(&self, id: &str, text: &str) -> Result<()> {
        if let Err(e) = validate_task_text(text) {
            let _ = self
                .notices
                .send(Notice::error("Task not updated").with_description(e.to_string()));
            return Err(e.into());
        }

        if !self.begin_mutation(id) {
            tracing::debug!(id, "mutation already in flight, dropping edit");
            return Ok(());
        }
        let result = self.store.update_text(id, text.trim()).await;
        self.end_mutation(id);

        match result {
            Ok(()) => {
                let _ = self.notices.send(Notice::success("Task updated"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save task: {}", e);
                let _ = self.notices.send(
                    Notice::error("Could not save task")
                        .with_description("The previous text is still in place."),
                );
                Err(e)
            }
        }
    }

    /// Summarize pending tasks into an update brief
    ///
    /// Returns `Ok(None)` when there was nothing to summarize or a run
    /// was already in flight. With pending tasks present, runs the
    /// summarization flow exactly once and stores the returned string
    /// verbatim for display. The previous summary is cleared when a run
    /// starts; a failed run leaves no stale summary behind.
    pub async fn summarize(&self) -> Result<Option<String>> {
        if self.summarizing.swap(true, Ordering::SeqCst) {
            tracing::debug!("summarize already in flight, ignoring");
            return Ok(None);
        }
        let result = self.summarize_inner().await;
        self.summarizing.store(false, Ordering::SeqCst);
        result
    }

    async fn summarize_inner(&self) -> Result<Option<String>> {
        self.set_summary(None);

        let pending: Vec<String> = self
            .mirror
            .read()
            .map(|snapshot| snapshot.pending().map(|task| task.text.clone()).collect())
            .unwrap_or_default();

        if pending.is_empty() {
            let _ = self.notices.send(
                Notice::info("No pending tasks")
                    .with_description("There are no pending tasks to summarize."),
            );
            return Ok(None);
        }

        let generator = self.require_generator()?;

        let input = SummarizeInput::new(pending);
        match flows::summarize::run(generator.as_ref(), &input).await {
            Ok(output) => {
                self.set_summary(Some(output.summary.clone()));
                let _ = self.notices.send(
                    Notice::success("Summary generated")
                        .with_description("The generated update is ready to share."),
                );
                Ok(Some(output.summary))
            }
            Err(err) => {
                log_flow_failure("summarize", &err);
                let _ = self.notices.send(
                    Notice::error("Could not generate summary").with_description("Please try again."),
                );
                Err(err.into())
            }
        }
    }

    /// Evaluate one candidate task against the current list
    ///
    /// Builds the current-tasks description from the mirror and runs the
    /// relevance flow once.
    pub async fn check_relevance(&self, task: &str) -> Result<RelevanceOutput> {
        let generator = self.require_generator()?;

        let input = RelevanceInput::new(task, self.describe_current_tasks());
        match flows::relevance::run(generator.as_ref(), &input).await {
            Ok(output) => Ok(output),
            Err(err) => {
                log_flow_failure("relevance", &err);
                let _ = self.notices.send(
                    Notice::error("Could not evaluate relevance")
                        .with_description("Please try again."),
                );
                Err(err.into())
            }
        }
    }

    /// Describe the mirrored task list as free text for the relevance flow
    pub fn describe_current_tasks(&self) -> String {
        let tasks = self.tasks();
        if tasks.is_empty() {
            return "No tasks are currently tracked.".to_string();
        }
        tasks
            .iter()
            .map(|task| {
                let state = if task.completed { "done" } else { "pending" };
                format!("- [{}] {}", state, task.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn require_generator(&self) -> Result<Arc<dyn Generator>> {
        match &self.generator {
            Some(generator) => Ok(Arc::clone(generator)),
            None => {
                let _ = self.notices.send(
                    Notice::error("No AI provider available")
                        .with_description("Check the provider configuration and try again."),
                );
                Err(TaskbriefError::Provider("no generator configured".to_string()).into())
            }
        }
    }

    fn begin_mutation(&self, id: &str) -> bool {
        match self.in_flight.lock() {
            Ok(mut guard) => guard.insert(id.to_string()),
            Err(_) => false,
        }
    }

    fn end_mutation(&self, id: &str) {
        if let Ok(mut guard) = self.in_flight.lock() {
            guard.remove(id);
        }
    }

    fn set_summary(&self, value: Option<String>) {
        if let Ok(mut guard) = self.summary.write() {
            *guard = value;
        }
    }
}

fn log_flow_failure(flow: &str, err: &FlowError) {
    // Transport and validation failures look the same to the user but
    // not to the logs.
    match err {
        FlowError::InvalidInput(msg) => tracing::error!(flow, "flow rejected input: {}", msg),
        FlowError::Transport(e) => tracing::error!(flow, "flow transport failure: {}", e),
        FlowError::InvalidOutput(msg) => {
            tracing::error!(flow, "flow output failed validation: {}", msg)
        }
    }
}
