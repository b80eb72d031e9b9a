// Single improvement pass for drafts that fail the quality gate
use super::response_parsing::{split_title_body, DraftText};
use crate::error::Result;
use crate::llm::LanguageModel;
use std::sync::Arc;

pub const EDITOR_SYSTEM_PROMPT: &str =
    "You are an expert blog editor. Improve the blog while keeping it engaging.";

#[derive(Clone)]
pub struct Reviser {
    model: Arc<dyn LanguageModel>,
}

impl Reviser {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn revise(&self, blog: &str) -> Result<DraftText> {
        tracing::info!(blog_chars = blog.len(), "🛠️ Revising blog post");

        let prompt = format!(
            "Enhance the following blog. Put the improved title alone on the first line, \
then the improved post:\n{}",
            blog
        );
        let response = self.model.complete(EDITOR_SYSTEM_PROMPT, &prompt).await?;

        let revision = split_title_body(&response);
        if revision.body.is_none() {
            tracing::warn!("Revision response was a single line; body left unchanged");
        }

        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;

    #[tokio::test]
    async fn test_revise_uses_editor_persona() {
        let model = Arc::new(ScriptedModel::new().reply("Better Title\nBetter body."));
        let reviser = Reviser::new(model.clone());

        let revision = reviser.revise("Weak body.").await.unwrap();

        assert_eq!(revision.title, "Better Title");
        assert_eq!(revision.body.as_deref(), Some("Better body."));

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, EDITOR_SYSTEM_PROMPT);
        assert!(calls[0].user.ends_with("\nWeak body."));
    }

    #[tokio::test]
    async fn test_single_line_revision() {
        let model = Arc::new(ScriptedModel::new().reply("Only a new title"));
        let revision = Reviser::new(model).revise("Weak body.").await.unwrap();

        assert_eq!(revision.title, "Only a new title");
        assert_eq!(revision.body, None);
    }
}
