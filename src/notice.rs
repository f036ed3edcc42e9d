//! Transient user-facing notices
//!
//! Notices are the terminal counterpart of toast messages: short,
//! dismissible, and never fatal. The controller emits them on an
//! unbounded channel; whichever surface is active drains and renders
//! them.

use colored::Colorize;
use tokio::sync::mpsc;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// A completed action
    Success,
    /// A failed action
    Error,
}

/// A transient, user-visible message
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Short headline
    pub title: String,
    /// Optional supporting detail
    pub description: Option<String>,
}

impl Notice {
    /// Create an informational notice
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            description: None,
        }
    }

    /// Create a success notice
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    /// Create an error notice
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: None,
        }
    }

    /// Attach supporting detail
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Render the notice as a colored terminal line
    pub fn render(&self) -> String {
        let tag = match self.level {
            NoticeLevel::Info => "info".blue(),
            NoticeLevel::Success => "ok".green(),
            NoticeLevel::Error => "error".red(),
        };
        match &self.description {
            Some(description) => format!("[{}] {} {}", tag, self.title.bold(), description),
            None => format!("[{}] {}", tag, self.title.bold()),
        }
    }
}

/// Sending half of a notice channel
pub type NoticeSender = mpsc::UnboundedSender<Notice>;

/// Receiving half of a notice channel
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Create a notice channel
pub fn channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Drain and print every notice currently queued
pub fn drain(receiver: &mut NoticeReceiver) {
    while let Ok(notice) = receiver.try_recv() {
        println!("{}", notice.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        let notice = Notice::info("Heads up");
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.title, "Heads up");
        assert!(notice.description.is_none());

        let notice = Notice::success("Task added").with_description("It is on the list.");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.description.as_deref(), Some("It is on the list."));

        let notice = Notice::error("Could not add task");
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn test_render_contains_title_and_description() {
        colored::control::set_override(false);
        let rendered = Notice::error("Could not add task")
            .with_description("Store unavailable.")
            .render();
        assert!(rendered.contains("Could not add task"));
        assert!(rendered.contains("Store unavailable."));
        colored::control::unset_override();
    }

    #[test]
    fn test_channel_delivers_in_order() {
        let (tx, mut rx) = channel();
        tx.send(Notice::info("first")).unwrap();
        tx.send(Notice::info("second")).unwrap();

        assert_eq!(rx.try_recv().unwrap().title, "first");
        assert_eq!(rx.try_recv().unwrap().title, "second");
        assert!(rx.try_recv().is_err());
    }
}
