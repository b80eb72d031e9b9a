// Executor - walks the graph from its entry point to End
use super::graph::{Node, StateGraph};
use super::state::{NodeName, StateUpdate, WorkflowState, WorkflowStatus};
use crate::error::{BlogError, Result};
use tokio::time::{timeout, Duration};
use tracing::{error, info};

pub struct ExecutorConfig {
    /// Guard against router bugs; a blog run needs at most three steps
    pub max_iterations: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

pub struct WorkflowExecutor {
    graph: StateGraph,
    config: ExecutorConfig,
}

impl WorkflowExecutor {
    pub fn new(graph: StateGraph, config: ExecutorConfig) -> Self {
        Self { graph, config }
    }

    /// Run to completion. Any node or router failure ends the run with that
    /// error; nothing is retried.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState> {
        info!(run_id = %state.run_id, video_url = %state.video_url, "🚀 Starting workflow execution");
        state.status = WorkflowStatus::Running;

        let mut current_node = self.graph.entry_point();
        let mut iteration = 0;

        loop {
            if current_node == NodeName::End {
                state.enter_node(NodeName::End);
                state.status = WorkflowStatus::Completed;
                break;
            }

            iteration += 1;
            if iteration > self.config.max_iterations {
                error!(run_id = %state.run_id, "Workflow hit iteration limit: {}", self.config.max_iterations);
                return Err(BlogError::Workflow(format!(
                    "Exceeded max iterations: {}",
                    self.config.max_iterations
                )));
            }

            let node = self
                .graph
                .get_node(current_node)
                .ok_or_else(|| BlogError::Workflow(format!("Node '{}' not found", current_node)))?;

            info!(run_id = %state.run_id, "📍 Step {}: {} ({})", iteration, node.id, node.description);
            state.enter_node(current_node);

            let update = match self.execute_node(node, &state).await {
                Ok(update) => update,
                Err(e) => {
                    error!(run_id = %state.run_id, "❌ Node '{}' failed: {}", current_node, e);
                    return Err(e);
                }
            };
            state.apply_update(update);

            current_node = match self.graph.next_node(current_node, &state).await {
                Ok(next) => next,
                Err(e) => {
                    error!(run_id = %state.run_id, "❌ Routing after '{}' failed: {}", current_node, e);
                    return Err(e);
                }
            };
        }

        info!(
            run_id = %state.run_id,
            path = ?state.path,
            "🏁 Workflow execution finished"
        );

        Ok(state)
    }

    async fn execute_node(&self, node: &Node, state: &WorkflowState) -> Result<StateUpdate> {
        let node_timeout = Duration::from_secs(node.timeout_seconds);

        match timeout(node_timeout, node.function.execute(state)).await {
            Ok(result) => result,
            Err(_) => Err(BlogError::NodeTimeout {
                node: node.id.to_string(),
                seconds: node.timeout_seconds,
            }),
        }
    }
}
