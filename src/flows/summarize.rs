//! Summarization flow: condense pending tasks into an update brief
//!
//! Input is the ordered list of pending task descriptions; output is a
//! single summary string shaped for posting to a team channel. One
//! generation call per run, no retry.

use crate::flows::{decode_output, FlowError};
use crate::providers::Generator;
use serde::{Deserialize, Serialize};

/// Input contract for the summarization flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeInput {
    /// Pending task descriptions, in display order
    pub tasks: Vec<String>,
}

impl SummarizeInput {
    /// Create a summarization input from pending task descriptions
    pub fn new(tasks: Vec<String>) -> Self {
        Self { tasks }
    }

    fn validate(&self) -> Result<(), FlowError> {
        if self.tasks.is_empty() {
            return Err(FlowError::InvalidInput(
                "at least one pending task is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Output contract for the summarization flow
///
/// `deny_unknown_fields` keeps the contract strict: a response carrying
/// anything beyond the summary fails validation rather than being
/// silently accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummarizeOutput {
    /// A concise summary of the pending tasks, tailored for a team update
    pub summary: String,
}

/// Render the summarization prompt for the given input
///
/// The template is fixed; only the bullet list varies with the input,
/// one `- ` line per pending task in order. Rendering is deterministic,
/// so tests can assert on the exact prompt a run produces.
pub fn render_prompt(input: &SummarizeInput) -> String {
    let mut bullets = String::new();
    for task in &input.tasks {
        bullets.push_str("- ");
        bullets.push_str(task);
        bullets.push('\n');
    }

    format!(
        "You are an expert AI assistant specializing in creating concise and actionable \
summaries for team updates on Slack.\n\
\n\
Your task is to summarize the following list of pending to-do items. Do not simply \
repeat the tasks verbatim. Instead, extract the most important information, group \
related items if appropriate, and provide a brief, high-level overview that is quick \
to read and understand.\n\
\n\
Pending to-do items:\n\
{bullets}\
\n\
Generate a summary that:\n\
- Is clear, concise, and informative.\n\
- Highlights key actions or themes from the list.\n\
- Uses newlines to separate distinct points or summarized tasks.\n\
- If the list is diverse or long, consider using bullet points (e.g., '*') for clarity.\n\
- Avoids directly copying the original task phrasing; rephrase and condense.\n\
- Is suitable for a professional Slack update.\n\
\n\
Respond with a JSON object of the form {{\"summary\": \"<the summary text>\"}} and \
nothing else."
    )
}

/// Run the summarization flow once against the given generator
///
/// # Errors
///
/// Returns [`FlowError::InvalidInput`] for an empty task list (no call
/// is made), [`FlowError::Transport`] if the generation call fails, and
/// [`FlowError::InvalidOutput`] if the model's output does not decode
/// into a non-empty summary.
pub async fn run(
    generator: &dyn Generator,
    input: &SummarizeInput,
) -> Result<SummarizeOutput, FlowError> {
    input.validate()?;

    let prompt = render_prompt(input);
    tracing::debug!(tasks = input.tasks.len(), "running summarization flow");

    let response = generator
        .generate(&prompt)
        .await
        .map_err(FlowError::Transport)?;

    let output: SummarizeOutput = decode_output(&response.text)?;
    if output.summary.trim().is_empty() {
        return Err(FlowError::InvalidOutput(
            "summary must not be empty".to_string(),
        ));
    }

    Ok(output)
}
