//! Flow layer for Taskbrief
//!
//! A flow is a named, schema-validated request/response wrapper around
//! one generation call. Each flow defines an input contract, an output
//! contract, a deterministic prompt template, and a single provider
//! invocation. Output that fails decoding or validation never reaches
//! the caller partially; it becomes an [`FlowError::InvalidOutput`].
//!
//! Transport failures and output-validation failures are distinct
//! variants so logs can tell them apart, even when the UI layer shows
//! one coarse failure notice for both.

pub mod relevance;
pub mod summarize;

pub use relevance::{RelevanceInput, RelevanceOutput};
pub use summarize::{SummarizeInput, SummarizeOutput};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure of a flow run
#[derive(Debug, Error)]
pub enum FlowError {
    /// The input did not satisfy the flow's contract; no call was made
    #[error("Invalid flow input: {0}")]
    InvalidInput(String),

    /// The generation call itself failed (network, HTTP status, auth)
    #[error("Generation request failed: {0}")]
    Transport(anyhow::Error),

    /// The model's output did not decode into the output contract
    #[error("Model output failed validation: {0}")]
    InvalidOutput(String),
}

/// Decode a model's raw text into a flow output contract
///
/// Tolerates the text forms JSON-mode models actually emit: surrounding
/// whitespace and stray prose or code fences around one JSON object.
/// Anything that does not decode into exactly the expected shape is an
/// [`FlowError::InvalidOutput`].
pub(crate) fn decode_output<T: DeserializeOwned>(raw: &str) -> Result<T, FlowError> {
    serde_json::from_str(extract_json(raw))
        .map_err(|e| FlowError::InvalidOutput(format!("{} (raw output: {:?})", e, raw)))
}

/// Narrow raw model text to the JSON object it contains
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end >= start => &trimmed[start..=end],
        _ => trimmed,
    }
}
