//! One-shot task commands: add, list, done, rm, edit

use crate::config::Config;
use crate::controller::AppController;
use crate::error::Result;
use crate::notice::{self, NoticeReceiver};
use crate::store::{SqliteTaskStore, Task};
use anyhow::bail;
use prettytable::{row, Table};
use std::sync::Arc;

/// Open the store and a controller with the mirror already populated
async fn open_controller(config: &Config) -> Result<(Arc<AppController>, NoticeReceiver)> {
    let store = Arc::new(SqliteTaskStore::from_config(&config.store)?);
    let (tx, rx) = notice::channel();

    let controller = Arc::new(AppController::new(store, tx));
    controller.spawn_subscription();
    while controller.is_loading() {
        tokio::task::yield_now().await;
    }

    Ok((controller, rx))
}

/// Resolve a task selector against the displayed list
///
/// Numeric selectors are 1-based task numbers as printed by `list`;
/// anything else matches as an id prefix (e.g. the first 8 characters
/// of the id).
pub fn resolve_selector<'a>(tasks: &'a [Task], selector: &str) -> Result<&'a Task> {
    if let Ok(index) = selector.parse::<usize>() {
        if index >= 1 {
            if let Some(task) = tasks.get(index - 1) {
                return Ok(task);
            }
        }
        bail!("No task number {} (run `taskbrief list`)", selector);
    }

    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.id.starts_with(selector))
        .collect();
    match matches.len() {
        1 => Ok(matches[0]),
        0 => bail!("No task id matches {}", selector),
        _ => bail!("Task selector {} is ambiguous", selector),
    }
}

/// Handle `taskbrief add <text>`
pub async fn add_task(config: &Config, text: &str) -> Result<()> {
    let (controller, mut notices) = open_controller(config).await?;
    let result = controller.add_task(text).await;
    notice::drain(&mut notices);
    result
}

/// Handle `taskbrief list [--json]`
pub async fn list_tasks(config: &Config, json: bool) -> Result<()> {
    let store = SqliteTaskStore::from_config(&config.store)?;
    let snapshot = store.subscribe().borrow().clone();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.tasks)?);
        return Ok(());
    }

    if snapshot.tasks.is_empty() {
        println!("All clear! You have no tasks.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["#", "Status", "Task", "Created", "Id"]);
    for (index, task) in snapshot.tasks.iter().enumerate() {
        let status = if task.completed { "done" } else { "pending" };
        table.add_row(row![
            index + 1,
            status,
            task.text,
            task.created_at.format("%Y-%m-%d %H:%M"),
            short_id(&task.id)
        ]);
    }
    table.printstd();

    Ok(())
}

/// Handle `taskbrief done <selector>`
pub async fn toggle_task(config: &Config, selector: &str) -> Result<()> {
    let (controller, mut notices) = open_controller(config).await?;
    let tasks = controller.tasks();
    let task = resolve_selector(&tasks, selector)?;

    let result = controller.toggle_task(&task.id).await;
    notice::drain(&mut notices);
    if result.is_ok() {
        let state = if task.completed { "pending" } else { "done" };
        println!("\"{}\" is now {}.", task.text, state);
    }
    result
}

/// Handle `taskbrief rm <selector>`
pub async fn delete_task(config: &Config, selector: &str) -> Result<()> {
    let (controller, mut notices) = open_controller(config).await?;
    let tasks = controller.tasks();
    let task = resolve_selector(&tasks, selector)?;

    let result = controller.delete_task(&task.id).await;
    notice::drain(&mut notices);
    result
}

/// Handle `taskbrief edit <selector> <text>`
pub async fn edit_task(config: &Config, selector: &str, text: &str) -> Result<()> {
    let (controller, mut notices) = open_controller(config).await?;
    let tasks = controller.tasks();
    let task = resolve_selector(&tasks, selector)?;

    let result = controller.edit_task(&task.id, text).await;
    notice::drain(&mut notices);
    result
}

fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, text: &str) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_selector_by_number() {
        let tasks = vec![task("aaa111", "first"), task("bbb222", "second")];
        assert_eq!(resolve_selector(&tasks, "2").unwrap().id, "bbb222");
    }

    #[test]
    fn test_resolve_selector_number_out_of_range() {
        let tasks = vec![task("aaa111", "first")];
        assert!(resolve_selector(&tasks, "0").is_err());
        assert!(resolve_selector(&tasks, "5").is_err());
    }

    #[test]
    fn test_resolve_selector_by_id_prefix() {
        let tasks = vec![task("aaa111", "first"), task("bbb222", "second")];
        assert_eq!(resolve_selector(&tasks, "bbb").unwrap().text, "second");
    }

    #[test]
    fn test_resolve_selector_ambiguous_prefix() {
        let tasks = vec![task("abc111", "first"), task("abc222", "second")];
        assert!(resolve_selector(&tasks, "abc").is_err());
    }

    #[test]
    fn test_resolve_selector_no_match() {
        let tasks = vec![task("aaa111", "first")];
        assert!(resolve_selector(&tasks, "zzz").is_err());
    }

    #[test]
    fn test_short_id_truncates() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
