// First draft of the blog post, straight from the transcript
use super::response_parsing::{split_title_body, DraftText};
use crate::error::Result;
use crate::llm::LanguageModel;
use std::sync::Arc;

pub const WRITER_SYSTEM_PROMPT: &str = "You are a professional blog writer.";

#[derive(Clone)]
pub struct DraftGenerator {
    model: Arc<dyn LanguageModel>,
}

impl DraftGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn draft(&self, transcript: &str) -> Result<DraftText> {
        tracing::info!(transcript_chars = transcript.len(), "✍️ Drafting blog post");

        let response = self
            .model
            .complete(WRITER_SYSTEM_PROMPT, &build_draft_prompt(transcript))
            .await?;

        let draft = split_title_body(&response);
        if draft.body.is_none() {
            tracing::warn!("Draft response was a single line; body left unchanged");
        }

        Ok(draft)
    }
}

fn build_draft_prompt(transcript: &str) -> String {
    format!(
        "Generate a well-structured blog post from this YouTube transcript. \
Put the blog title alone on the first line, then the post.\n{}",
        transcript
    )
}
