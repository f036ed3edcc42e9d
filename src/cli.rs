//! Command-line interface definition for Taskbrief
//!
//! This module defines the CLI structure using clap's derive API,
//! providing an interactive session plus one-shot task and brief commands.

use clap::{Parser, Subcommand};

/// Taskbrief - task list CLI with AI-assisted update briefs
///
/// Track tasks in a live-updating local store and condense the pending
/// ones into a short update suitable for posting to a team channel.
#[derive(Parser, Debug, Clone)]
#[command(name = "taskbrief")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the task database path
    #[arg(long)]
    pub store_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Taskbrief
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive task session
    Session {
        /// Override the provider from config (ollama, openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model for the selected provider
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Add a new task
    Add {
        /// Task description (1-200 characters)
        text: String,
    },

    /// List tasks, pending before completed
    List {
        /// Emit the snapshot as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Toggle a task's completion state
    Done {
        /// Task number from `list` or a task id prefix
        selector: String,
    },

    /// Delete a task
    Rm {
        /// Task number from `list` or a task id prefix
        selector: String,
    },

    /// Replace a task's description
    Edit {
        /// Task number from `list` or a task id prefix
        selector: String,

        /// New task description (1-200 characters)
        text: String,
    },

    /// Summarize pending tasks into an update brief
    Brief {
        /// Override the provider from config (ollama, openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model for the selected provider
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask whether a task belongs in an update, given the current list
    Relevance {
        /// Candidate task description
        text: String,

        /// Override the provider from config (ollama, openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model for the selected provider
        #[arg(short, long)]
        model: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_session() {
        let cli = Cli::try_parse_from(["taskbrief", "session"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert!(matches!(cli.command, Commands::Session { .. }));
    }

    #[test]
    fn test_cli_parse_session_with_provider() {
        let cli = Cli::try_parse_from(["taskbrief", "session", "--provider", "openai"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Session { provider, model } = cli.command {
            assert_eq!(provider, Some("openai".to_string()));
            assert_eq!(model, None);
        } else {
            panic!("Expected Session command");
        }
    }

    #[test]
    fn test_cli_parse_add() {
        let cli = Cli::try_parse_from(["taskbrief", "add", "Buy milk"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Add { text } = cli.command {
            assert_eq!(text, "Buy milk");
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["taskbrief", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::List { json } = cli.command {
            assert!(!json);
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_cli_parse_list_json() {
        let cli = Cli::try_parse_from(["taskbrief", "list", "--json"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::List { json } = cli.command {
            assert!(json);
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_cli_parse_done() {
        let cli = Cli::try_parse_from(["taskbrief", "done", "2"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Done { selector } = cli.command {
            assert_eq!(selector, "2");
        } else {
            panic!("Expected Done command");
        }
    }

    #[test]
    fn test_cli_parse_rm_with_id_prefix() {
        let cli = Cli::try_parse_from(["taskbrief", "rm", "3fa85f64"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Rm { selector } = cli.command {
            assert_eq!(selector, "3fa85f64");
        } else {
            panic!("Expected Rm command");
        }
    }

    #[test]
    fn test_cli_parse_edit() {
        let cli = Cli::try_parse_from(["taskbrief", "edit", "1", "Buy oat milk"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Edit { selector, text } = cli.command {
            assert_eq!(selector, "1");
            assert_eq!(text, "Buy oat milk");
        } else {
            panic!("Expected Edit command");
        }
    }

    #[test]
    fn test_cli_parse_brief() {
        let cli = Cli::try_parse_from(["taskbrief", "brief"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert!(matches!(cli.command, Commands::Brief { .. }));
    }

    #[test]
    fn test_cli_parse_brief_with_model() {
        let cli = Cli::try_parse_from(["taskbrief", "brief", "--model", "llama3.2:1b"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Brief { provider, model } = cli.command {
            assert_eq!(provider, None);
            assert_eq!(model, Some("llama3.2:1b".to_string()));
        } else {
            panic!("Expected Brief command");
        }
    }

    #[test]
    fn test_cli_parse_relevance() {
        let cli = Cli::try_parse_from(["taskbrief", "relevance", "Fix critical production bug"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Relevance { text, .. } = cli.command {
            assert_eq!(text, "Fix critical production bug");
        } else {
            panic!("Expected Relevance command");
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::try_parse_from(["taskbrief", "--config", "custom.yaml", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_with_store_path() {
        let cli = Cli::try_parse_from(["taskbrief", "--store-path", "/tmp/tasks.db", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.store_path, Some("/tmp/tasks.db".to_string()));
    }

    #[test]
    fn test_cli_parse_with_verbose() {
        let cli = Cli::try_parse_from(["taskbrief", "-v", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_missing_command() {
        let cli = Cli::try_parse_from(["taskbrief"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        let cli = Cli::try_parse_from(["taskbrief", "invalid"]);
        assert!(cli.is_err());
    }
}
