// Blog workflow - transcriptor -> blogger -> (reviewer | end)
use super::executor::{ExecutorConfig, WorkflowExecutor};
use super::graph::{NodeFunction, StateGraph, StateGraphBuilder};
use super::router::{review_on_fail, transcript_gate, QualityGate, VerdictPredicate};
use super::state::{NodeName, StateUpdate, WorkflowState};
use crate::agent::{DraftGenerator, QualityScorer, Reviser};
use crate::config::{Config, ScoreParsePolicy, TranscriptErrorPolicy};
use crate::error::{BlogError, Result};
use crate::llm::LanguageModel;
use crate::youtube_transcript::{TranscriptFetcher, TranscriptSource};
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches the transcript for the state's video reference
pub struct TranscriptorNode {
    fetcher: TranscriptFetcher,
}

#[async_trait]
impl NodeFunction for TranscriptorNode {
    async fn execute(&self, state: &WorkflowState) -> Result<StateUpdate> {
        let transcript = self.fetcher.fetch(&state.video_url).await;
        Ok(StateUpdate::new().with_transcript(transcript))
    }
}

/// Writes the first draft from the transcript
pub struct BloggerNode {
    generator: DraftGenerator,
}

#[async_trait]
impl NodeFunction for BloggerNode {
    async fn execute(&self, state: &WorkflowState) -> Result<StateUpdate> {
        let transcript = state
            .transcript
            .as_ref()
            .ok_or_else(|| BlogError::Workflow("Blogger ran before a transcript was fetched".to_string()))?;

        // With the `continue` policy an error marker is drafted from as-is
        let draft = self.generator.draft(&transcript.to_string()).await?;
        Ok(StateUpdate::new().with_draft(draft))
    }
}

/// One revision pass over the current draft
pub struct ReviewerNode {
    reviser: Reviser,
}

#[async_trait]
impl NodeFunction for ReviewerNode {
    async fn execute(&self, state: &WorkflowState) -> Result<StateUpdate> {
        let blog = state
            .review_input()
            .ok_or_else(|| BlogError::Workflow("Reviewer ran without a draft".to_string()))?;

        let revision = self.reviser.revise(blog).await?;
        Ok(StateUpdate::new().with_draft(revision))
    }
}

/// Knobs for assembling the blog graph
#[derive(Clone)]
pub struct WorkflowOptions {
    pub score_parse_policy: ScoreParsePolicy,
    pub transcript_error_policy: TranscriptErrorPolicy,
    pub node_timeout_seconds: u64,
    pub verdict_predicate: VerdictPredicate,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            score_parse_policy: ScoreParsePolicy::Fatal,
            transcript_error_policy: TranscriptErrorPolicy::ShortCircuit,
            node_timeout_seconds: 300,
            verdict_predicate: review_on_fail(),
        }
    }
}

impl From<&Config> for WorkflowOptions {
    fn from(config: &Config) -> Self {
        Self {
            score_parse_policy: config.score_parse_policy,
            transcript_error_policy: config.transcript_error_policy,
            node_timeout_seconds: config.node_timeout_seconds,
            ..Self::default()
        }
    }
}

/// Build the blog generation graph
pub fn build_blog_workflow(
    model: Arc<dyn LanguageModel>,
    transcript_source: Arc<dyn TranscriptSource>,
    options: &WorkflowOptions,
) -> Result<StateGraph> {
    let transcriptor = Arc::new(TranscriptorNode {
        fetcher: TranscriptFetcher::new(transcript_source),
    });
    let blogger = Arc::new(BloggerNode {
        generator: DraftGenerator::new(model.clone()),
    });
    let reviewer = Arc::new(ReviewerNode {
        reviser: Reviser::new(model.clone()),
    });
    let quality_gate = Arc::new(QualityGate::new(
        QualityScorer::new(model, options.score_parse_policy),
        options.verdict_predicate.clone(),
    ));

    let builder = StateGraphBuilder::new()
        .node_timeout(options.node_timeout_seconds)
        .add_node(NodeName::Transcriptor, transcriptor, "Fetch the video transcript")
        .add_node(NodeName::Blogger, blogger, "Draft a blog post from the transcript")
        .add_node(NodeName::Reviewer, reviewer, "Revise a draft that failed the quality gate")
        .set_entry_point(NodeName::Transcriptor)
        .add_conditional_edge(NodeName::Blogger, quality_gate)
        .add_edge(NodeName::Reviewer, NodeName::End);

    let builder = match options.transcript_error_policy {
        TranscriptErrorPolicy::ShortCircuit => {
            builder.add_conditional_edge(NodeName::Transcriptor, transcript_gate(NodeName::Blogger))
        }
        TranscriptErrorPolicy::Continue => builder.add_edge(NodeName::Transcriptor, NodeName::Blogger),
    };

    builder.build()
}

/// Build the graph and wrap it in an executor
pub fn create_blog_workflow_executor(
    model: Arc<dyn LanguageModel>,
    transcript_source: Arc<dyn TranscriptSource>,
    options: &WorkflowOptions,
) -> Result<WorkflowExecutor> {
    let graph = build_blog_workflow(model, transcript_source, options)?;
    Ok(WorkflowExecutor::new(graph, ExecutorConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::draft_generator::WRITER_SYSTEM_PROMPT;
    use crate::agent::Verdict;
    use crate::agent::quality_scorer::SCORER_SYSTEM_PROMPT;
    use crate::agent::reviser::EDITOR_SYSTEM_PROMPT;
    use crate::llm::testing::ScriptedModel;
    use crate::workflow::state::{BlogOutcome, WorkflowStatus};
    use crate::youtube_transcript::testing::ScriptedTranscriptSource;

    const VIDEO_URL: &str = "https://youtu.be/watch?v=abc123";

    async fn run_with(
        model: Arc<ScriptedModel>,
        source: Arc<ScriptedTranscriptSource>,
        options: WorkflowOptions,
    ) -> Result<WorkflowState> {
        let executor = create_blog_workflow_executor(model, source, &options).unwrap();
        executor.run(WorkflowState::new(VIDEO_URL)).await
    }

    fn captions() -> Arc<ScriptedTranscriptSource> {
        Arc::new(ScriptedTranscriptSource::with_fragments(&["first caption", "second caption"]))
    }

    #[tokio::test]
    async fn test_passing_draft_skips_reviewer() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Great Title\nGreat body.")
                .reply(r#"{"overall_score": 90}"#),
        );
        let source = captions();

        let state = run_with(model.clone(), source.clone(), WorkflowOptions::default()).await.unwrap();

        assert_eq!(source.requested_ids(), vec!["abc123".to_string()]);
        assert_eq!(model.calls_with_system(WRITER_SYSTEM_PROMPT), 1);
        assert_eq!(model.calls_with_system(SCORER_SYSTEM_PROMPT), 1);
        assert_eq!(model.calls_with_system(EDITOR_SYSTEM_PROMPT), 0);
        assert!(!state.visited(NodeName::Reviewer));
        assert_eq!(
            state.path,
            vec![NodeName::Start, NodeName::Transcriptor, NodeName::Blogger, NodeName::End]
        );
        assert_eq!(state.status, WorkflowStatus::Completed);
        assert_eq!(
            state.outcome(),
            Some(BlogOutcome::Published {
                title: "Great Title".to_string(),
                body: "Great body.".to_string(),
            })
        );

        // Transcript reaches the writer verbatim, newline-joined
        assert!(model.calls()[0].user.ends_with("\nfirst caption\nsecond caption"));
        // The scorer sees the drafted body, not the title
        assert!(model.calls()[1].user.contains("Great body."));
    }

    #[tokio::test]
    async fn test_failing_draft_is_revised_exactly_once() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Meh Title\nMeh body.")
                .reply(r#"{"overall_score": 70}"#)
                .reply("Better Title\nBetter body."),
        );

        let state = run_with(model.clone(), captions(), WorkflowOptions::default()).await.unwrap();

        assert_eq!(model.calls_with_system(EDITOR_SYSTEM_PROMPT), 1);
        // No re-scoring after the revision
        assert_eq!(model.calls_with_system(SCORER_SYSTEM_PROMPT), 1);
        assert_eq!(model.calls().len(), 3);
        assert!(model.calls()[2].user.ends_with("\nMeh body."));

        assert_eq!(state.blog_title.as_deref(), Some("Better Title"));
        assert_eq!(state.blog.as_deref(), Some("Better body."));
        assert_eq!(
            state.path,
            vec![
                NodeName::Start,
                NodeName::Transcriptor,
                NodeName::Blogger,
                NodeName::Reviewer,
                NodeName::End
            ]
        );
    }

    #[tokio::test]
    async fn test_transcript_failure_short_circuits() {
        let model = Arc::new(ScriptedModel::new());
        let source = Arc::new(ScriptedTranscriptSource::failing("Transcripts are disabled"));

        let state = run_with(model.clone(), source, WorkflowOptions::default()).await.unwrap();

        assert!(model.calls().is_empty());
        assert!(!state.visited(NodeName::Blogger));
        assert_eq!(state.blog_title, None);
        assert_eq!(
            state.outcome(),
            Some(BlogOutcome::TranscriptFailed {
                error: "Error: Transcripts are disabled".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_known_defect_continue_policy_drafts_from_error_marker() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Nonsense Title\nA post about an error.")
                .reply(r#"{"overall_score": 95}"#),
        );
        let source = Arc::new(ScriptedTranscriptSource::failing("Transcripts are disabled"));
        let options = WorkflowOptions {
            transcript_error_policy: TranscriptErrorPolicy::Continue,
            ..WorkflowOptions::default()
        };

        let state = run_with(model.clone(), source, options).await.unwrap();

        assert!(model.calls()[0].user.ends_with("\nError: Transcripts are disabled"));
        assert_eq!(state.blog_title.as_deref(), Some("Nonsense Title"));
        // The caller still sees the transcript error, not the garbage draft
        assert!(matches!(state.outcome(), Some(BlogOutcome::TranscriptFailed { .. })));
    }

    #[tokio::test]
    async fn test_single_line_draft_then_revision() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Only a title")
                .reply(r#"{"overall_score": 40}"#)
                .reply("Revised title only"),
        );

        let state = run_with(model.clone(), captions(), WorkflowOptions::default()).await.unwrap();

        // Scorer and reviser fall back to the title when no body was set
        assert!(model.calls()[1].user.contains("Blog:\nOnly a title\n"));
        assert!(model.calls()[2].user.ends_with("\nOnly a title"));
        assert_eq!(state.blog_title.as_deref(), Some("Revised title only"));
        assert_eq!(state.blog, None);
    }

    #[tokio::test]
    async fn test_single_line_revision_keeps_blogger_body() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Draft Title\nDraft body.")
                .reply(r#"{"overall_score": 60}"#)
                .reply("Revised Title"),
        );

        let state = run_with(model, captions(), WorkflowOptions::default()).await.unwrap();

        assert_eq!(state.blog_title.as_deref(), Some("Revised Title"));
        assert_eq!(state.blog.as_deref(), Some("Draft body."));
    }

    #[tokio::test]
    async fn test_unparseable_score_is_fatal_by_default() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Title\nBody")
                .reply("Looks good to me!"),
        );

        let err = run_with(model.clone(), captions(), WorkflowOptions::default()).await.unwrap_err();

        assert!(matches!(err, BlogError::ScoringParse(_)));
        assert_eq!(model.calls_with_system(EDITOR_SYSTEM_PROMPT), 0);
    }

    #[tokio::test]
    async fn test_unparseable_score_can_route_to_reviewer() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Title\nBody")
                .reply("Looks good to me!")
                .reply("Fixed Title\nFixed body"),
        );
        let options = WorkflowOptions {
            score_parse_policy: ScoreParsePolicy::TreatAsFail,
            ..WorkflowOptions::default()
        };

        let state = run_with(model, captions(), options).await.unwrap();

        assert!(state.visited(NodeName::Reviewer));
        assert_eq!(state.blog.as_deref(), Some("Fixed body"));
    }

    #[tokio::test]
    async fn test_model_failure_terminates_run() {
        let model = Arc::new(ScriptedModel::new().fail("503 service unavailable"));

        let err = run_with(model.clone(), captions(), WorkflowOptions::default()).await.unwrap_err();

        assert!(matches!(err, BlogError::ModelInvocation(_)));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_predicate_controls_branch() {
        let model = Arc::new(
            ScriptedModel::new()
                .reply("Title\nBody")
                .reply(r#"{"overall_score": 99}"#)
                .reply("Forced Title\nForced body"),
        );
        let options = WorkflowOptions {
            verdict_predicate: Arc::new(|_: Verdict| NodeName::Reviewer),
            ..WorkflowOptions::default()
        };

        let state = run_with(model, captions(), options).await.unwrap();

        assert!(state.visited(NodeName::Reviewer));
        assert_eq!(state.blog_title.as_deref(), Some("Forced Title"));
    }
}
