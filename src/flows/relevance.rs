//! Relevance flow: decide whether a task belongs in an update
//!
//! Input is one candidate task plus a free-text description of the
//! current task list; output is a boolean verdict with a justification.
//! Intended for per-task filtering ahead of an update digest; the
//! interactive summarize path does not call it.

use crate::flows::{decode_output, FlowError};
use crate::providers::Generator;
use serde::{Deserialize, Serialize};

/// Input contract for the relevance flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceInput {
    /// The task to evaluate for relevance
    pub task: String,
    /// A description of all current tasks
    pub current_tasks: String,
}

impl RelevanceInput {
    /// Create a relevance input for one candidate task
    pub fn new(task: impl Into<String>, current_tasks: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            current_tasks: current_tasks.into(),
        }
    }

    fn validate(&self) -> Result<(), FlowError> {
        if self.task.trim().is_empty() {
            return Err(FlowError::InvalidInput(
                "task description is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output contract for the relevance flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelevanceOutput {
    /// Whether the task is relevant for inclusion in the update
    pub is_relevant: bool,
    /// The reason for the task being relevant or irrelevant
    pub reason: String,
}

/// Render the relevance prompt for the given input
pub fn render_prompt(input: &RelevanceInput) -> String {
    format!(
        "You are an AI assistant helping to determine the relevance of individual tasks \
for inclusion in a Slack update.\n\
\n\
Given the following task:\n\
{task}\n\
\n\
And the context of current tasks:\n\
{current_tasks}\n\
\n\
Determine if the task is relevant for a Slack update. Consider factors such as \
urgency, importance, and impact on team members.\n\
\n\
Respond with a JSON object of the form {{\"is_relevant\": true or false, \
\"reason\": \"<why the task is or is not relevant>\"}} and nothing else.",
        task = input.task,
        current_tasks = input.current_tasks,
    )
}

/// Run the relevance flow once against the given generator
///
/// # Errors
///
/// Returns [`FlowError::InvalidInput`] for an empty task description (no
/// call is made), [`FlowError::Transport`] if the generation call fails,
/// and [`FlowError::InvalidOutput`] if the model's output does not
/// decode into the output contract.
pub async fn run(
    generator: &dyn Generator,
    input: &RelevanceInput,
) -> Result<RelevanceOutput, FlowError> {
    input.validate()?;

    let prompt = render_prompt(input);
    tracing::debug!(task = %input.task, "running relevance flow");

    let response = generator
        .generate(&prompt)
        .await
        .map_err(FlowError::Transport)?;

    decode_output(&response.text)
}
