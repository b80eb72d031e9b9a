// Router - conditional routing and decision logic
use super::graph::EdgeRouter;
use super::state::{NodeName, WorkflowState};
use crate::agent::{QualityScorer, Verdict};
use crate::error::{BlogError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Maps a quality verdict to the node that should run next
pub type VerdictPredicate = Arc<dyn Fn(Verdict) -> NodeName + Send + Sync>;

/// Default gate: failing drafts get one revision, passing drafts are done
pub fn review_on_fail() -> VerdictPredicate {
    Arc::new(|verdict: Verdict| match verdict {
        Verdict::Pass => NodeName::End,
        Verdict::Fail => NodeName::Reviewer,
    })
}

/// Scores the freshly drafted body and routes on the verdict.
/// The verdict itself is never written into the state.
pub struct QualityGate {
    scorer: QualityScorer,
    predicate: VerdictPredicate,
}

impl QualityGate {
    pub fn new(scorer: QualityScorer, predicate: VerdictPredicate) -> Self {
        Self { scorer, predicate }
    }
}

#[async_trait]
impl EdgeRouter for QualityGate {
    async fn route(&self, state: &WorkflowState) -> Result<NodeName> {
        let blog = state
            .review_input()
            .ok_or_else(|| BlogError::Workflow("Quality gate reached without a draft".to_string()))?;

        let verdict = self.scorer.score(blog).await?;
        let next = (self.predicate)(verdict);
        tracing::info!(run_id = %state.run_id, ?verdict, next = %next, "🚦 Quality gate decision");
        Ok(next)
    }
}

/// Router over plain state predicates, first match wins
pub struct RouterBuilder {
    conditions: Vec<(Box<dyn Fn(&WorkflowState) -> bool + Send + Sync>, NodeName)>,
    default: NodeName,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            default: NodeName::End,
        }
    }

    /// Add condition with target node
    pub fn when<F>(mut self, condition: F, target: NodeName) -> Self
    where
        F: Fn(&WorkflowState) -> bool + Send + Sync + 'static,
    {
        self.conditions.push((Box::new(condition), target));
        self
    }

    /// Target when no condition matches (End unless set)
    pub fn otherwise(mut self, target: NodeName) -> Self {
        self.default = target;
        self
    }

    pub fn build(self) -> Arc<dyn EdgeRouter> {
        Arc::new(ConditionRouter {
            conditions: self.conditions,
            default: self.default,
        })
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct ConditionRouter {
    conditions: Vec<(Box<dyn Fn(&WorkflowState) -> bool + Send + Sync>, NodeName)>,
    default: NodeName,
}

#[async_trait]
impl EdgeRouter for ConditionRouter {
    async fn route(&self, state: &WorkflowState) -> Result<NodeName> {
        Ok(self
            .conditions
            .iter()
            .find(|(condition, _)| condition(state))
            .map(|(_, target)| *target)
            .unwrap_or(self.default))
    }
}

/// Stops the run when the transcript step produced an error marker
pub fn transcript_gate(next: NodeName) -> Arc<dyn EdgeRouter> {
    RouterBuilder::new()
        .when(|state: &WorkflowState| state.transcript_failed(), NodeName::End)
        .otherwise(next)
        .build()
}
