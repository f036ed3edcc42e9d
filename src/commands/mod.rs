//! Command handlers for Taskbrief
//!
//! Each submodule implements one or more CLI subcommands: the
//! interactive session, one-shot task operations, and the brief and
//! relevance actions.

pub mod brief;
pub mod session;
pub mod tasks;
