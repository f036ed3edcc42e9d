//! Interactive task session
//!
//! A rustyline REPL over the application controller: add, toggle, edit,
//! and delete tasks, and generate an update brief from the pending ones.
//! The task list re-renders from the mirror after every command, and
//! queued notices print before each prompt.

use crate::controller::AppController;
use crate::error::Result;
use crate::notice::{self, NoticeReceiver};
use crate::store::Task;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

const PROMPT: &str = "taskbrief> ";

/// Outcome of one dispatched session command
enum CommandOutcome {
    Continue,
    Exit,
}

/// Run the interactive session until the user quits
pub async fn run(controller: Arc<AppController>, mut notices: NoticeReceiver) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("{}", "taskbrief".bold());
    println!("Type 'help' for commands.\n");

    // Give the subscription loop a chance to deliver the initial
    // snapshot before the first render.
    while controller.is_loading() {
        tokio::task::yield_now().await;
    }
    render_tasks(&controller.tasks());

    loop {
        notice::drain(&mut notices);

        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match dispatch(&controller, line).await {
                    CommandOutcome::Continue => {}
                    CommandOutcome::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    notice::drain(&mut notices);
    Ok(())
}

async fn dispatch(controller: &AppController, line: &str) -> CommandOutcome {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "help" | "?" => print_help(),
        "quit" | "exit" | "q" => return CommandOutcome::Exit,
        "list" | "ls" => render_tasks(&controller.tasks()),
        "add" => {
            if rest.is_empty() {
                println!("usage: add <task description>");
            } else {
                let _ = controller.add_task(rest).await;
                render_after_change(controller).await;
            }
        }
        "done" => match resolve_index(&controller.tasks(), rest) {
            Some(task) => {
                let _ = controller.toggle_task(&task.id).await;
                render_after_change(controller).await;
            }
            None => println!("usage: done <task number>"),
        },
        "rm" | "del" => match resolve_index(&controller.tasks(), rest) {
            Some(task) => {
                let _ = controller.delete_task(&task.id).await;
                render_after_change(controller).await;
            }
            None => println!("usage: rm <task number>"),
        },
        "edit" => {
            let (selector, text) = match rest.split_once(char::is_whitespace) {
                Some((selector, text)) => (selector, text.trim()),
                None => (rest, ""),
            };
            match resolve_index(&controller.tasks(), selector) {
                Some(task) if !text.is_empty() => {
                    let _ = controller.edit_task(&task.id, text).await;
                    render_after_change(controller).await;
                }
                _ => println!("usage: edit <task number> <new description>"),
            }
        }
        "brief" | "summarize" => {
            if let Ok(Some(summary)) = controller.summarize().await {
                print_summary(&summary);
            }
        }
        other => println!("Unknown command: {} (try 'help')", other),
    }

    CommandOutcome::Continue
}

/// Wait for the mirror to pick up the mutation just issued, then render
///
/// The store publishes synchronously with the mutation, so one yield is
/// normally enough for the subscription loop to apply it.
async fn render_after_change(controller: &AppController) {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    render_tasks(&controller.tasks());
}

/// Resolve a 1-based task number against the displayed list
fn resolve_index<'a>(tasks: &'a [Task], selector: &str) -> Option<&'a Task> {
    let index: usize = selector.parse().ok()?;
    if index == 0 {
        return None;
    }
    tasks.get(index - 1)
}

fn render_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", "All clear! You have no tasks.".dimmed());
        return;
    }

    let pending: Vec<(usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| !task.completed)
        .collect();
    let completed: Vec<(usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.completed)
        .collect();

    if !pending.is_empty() {
        println!("{}", format!("Pending tasks ({})", pending.len()).bold());
        for (index, task) in &pending {
            println!("  {:>3}. [ ] {}", index + 1, task.text);
        }
    }

    if !completed.is_empty() {
        println!(
            "{}",
            format!("Completed tasks ({})", completed.len()).green()
        );
        for (index, task) in &completed {
            println!(
                "  {:>3}. [x] {}",
                index + 1,
                task.text.dimmed().strikethrough()
            );
        }
    }
}

fn print_summary(summary: &str) {
    println!();
    println!("{}", "Update brief".bold().underline());
    println!("{}", summary);
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  list               Show tasks, pending before completed");
    println!("  add <text>         Add a task (1-200 characters)");
    println!("  done <n>           Toggle completion for task n");
    println!("  edit <n> <text>    Replace the text of task n");
    println!("  rm <n>             Delete task n");
    println!("  brief              Summarize pending tasks into an update");
    println!("  help               Show this help");
    println!("  quit               Leave the session");
}
