// Language model port - one system instruction, one user instruction, free-form text back
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run a single stateless completion and return the raw response text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
