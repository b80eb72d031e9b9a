// Quality gate - asks the model for a 0-100 score and classifies it
use super::response_parsing::{parse_score, SCORE_FIELD};
use crate::config::ScoreParsePolicy;
use crate::error::{BlogError, Result};
use crate::llm::LanguageModel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SCORER_SYSTEM_PROMPT: &str = "You are an AI that evaluates blog quality.";

/// Minimum score a draft needs to skip the revision pass
pub const PASS_THRESHOLD: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= PASS_THRESHOLD {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

#[derive(Clone)]
pub struct QualityScorer {
    model: Arc<dyn LanguageModel>,
    parse_policy: ScoreParsePolicy,
}

impl QualityScorer {
    pub fn new(model: Arc<dyn LanguageModel>, parse_policy: ScoreParsePolicy) -> Self {
        Self { model, parse_policy }
    }

    pub async fn score(&self, blog: &str) -> Result<Verdict> {
        let response = self
            .model
            .complete(SCORER_SYSTEM_PROMPT, &build_scoring_prompt(blog))
            .await?;

        match parse_score(&response) {
            Ok(score) => {
                let verdict = Verdict::from_score(score);
                tracing::info!(score, ?verdict, "📊 Blog scored");
                Ok(verdict)
            }
            Err(BlogError::ScoringParse(reason)) if self.parse_policy == ScoreParsePolicy::TreatAsFail => {
                tracing::warn!("Unparseable quality score, treating draft as failing: {}", reason);
                Ok(Verdict::Fail)
            }
            Err(e) => {
                tracing::error!("Quality scoring failed: {}", e);
                Err(e)
            }
        }
    }
}

fn build_scoring_prompt(blog: &str) -> String {
    format!(
        r#"Analyze the following blog and provide a single quality score (0-100).
Higher score means better readability, grammar, and engagement.

Blog:
{}

Respond ONLY with JSON in exactly this format, no other text:
{{"{}": <integer 0-100>}}"#,
        blog, SCORE_FIELD
    )
}
