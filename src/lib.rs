// lib.rs - YouTube video to blog post generator with an LLM quality gate
pub mod config;
pub mod error;
pub mod llm;
pub mod groq_client;
pub mod youtube_transcript;
pub mod agent;
pub mod workflow;
pub mod models;
pub mod handlers;
pub mod middleware;

pub use config::Config;
pub use error::{BlogError, Result};
pub use workflow::{BlogOutcome, WorkflowExecutor, WorkflowState};

/// Shared state handed to every request handler
pub struct AppState {
    pub executor: WorkflowExecutor,
    pub model_name: String,
}
