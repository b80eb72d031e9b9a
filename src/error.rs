// Error taxonomy for a blog generation run
use thiserror::Error;

/// Every variant terminates the run it occurs in. Transcript failures are not
/// listed here: they travel as data in `TranscriptResult::Error`.
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Could not parse quality score: {0}")]
    ScoringParse(String),

    #[error("Node '{node}' timed out after {seconds}s")]
    NodeTimeout { node: String, seconds: u64 },

    #[error("Workflow error: {0}")]
    Workflow(String),
}

pub type Result<T> = std::result::Result<T, BlogError>;
