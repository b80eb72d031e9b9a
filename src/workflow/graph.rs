// StateGraph - nodes, edges and validation for the blog workflow
use super::state::{NodeName, StateUpdate, WorkflowState};
use crate::error::{BlogError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Work done at a node; returns the fields it wants changed
#[async_trait]
pub trait NodeFunction: Send + Sync {
    async fn execute(&self, state: &WorkflowState) -> Result<StateUpdate>;
}

/// Decides the next node from the state after a node ran
#[async_trait]
pub trait EdgeRouter: Send + Sync {
    async fn route(&self, state: &WorkflowState) -> Result<NodeName>;
}

#[derive(Clone)]
pub enum EdgeType {
    /// Always follows this path
    Fixed(NodeName),
    /// Router decides at runtime
    Conditional(Arc<dyn EdgeRouter>),
}

impl std::fmt::Debug for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeType::Fixed(target) => write!(f, "Fixed({})", target),
            EdgeType::Conditional(_) => write!(f, "Conditional(<router>)"),
        }
    }
}

pub struct Node {
    pub id: NodeName,
    pub function: Arc<dyn NodeFunction>,
    pub description: String,
    pub timeout_seconds: u64,
}

pub struct StateGraph {
    nodes: HashMap<NodeName, Node>,
    edges: HashMap<NodeName, EdgeType>,
    entry_point: NodeName,
}

impl StateGraph {
    pub fn get_node(&self, node_id: NodeName) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn entry_point(&self) -> NodeName {
        self.entry_point
    }

    /// Next node after `current`. Nodes without an outgoing edge lead to End.
    pub async fn next_node(&self, current: NodeName, state: &WorkflowState) -> Result<NodeName> {
        let next = match self.edges.get(&current) {
            Some(EdgeType::Fixed(target)) => *target,
            Some(EdgeType::Conditional(router)) => router.route(state).await?,
            None => NodeName::End,
        };

        if next != NodeName::End && !self.nodes.contains_key(&next) {
            return Err(BlogError::Workflow(format!(
                "Router after '{}' chose unregistered node '{}'",
                current, next
            )));
        }

        Ok(next)
    }
}

/// Builder pattern for StateGraph
pub struct StateGraphBuilder {
    nodes: HashMap<NodeName, Node>,
    edges: HashMap<NodeName, EdgeType>,
    entry_point: Option<NodeName>,
    timeout_seconds: u64,
}

impl StateGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry_point: None,
            timeout_seconds: 300,
        }
    }

    /// Timeout applied to nodes added after this call
    pub fn node_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn add_node(mut self, id: NodeName, function: Arc<dyn NodeFunction>, description: &str) -> Self {
        let node = Node {
            id,
            function,
            description: description.to_string(),
            timeout_seconds: self.timeout_seconds,
        };
        self.nodes.insert(id, node);
        self
    }

    pub fn add_edge(mut self, from: NodeName, to: NodeName) -> Self {
        self.edges.insert(from, EdgeType::Fixed(to));
        self
    }

    pub fn add_conditional_edge(mut self, from: NodeName, router: Arc<dyn EdgeRouter>) -> Self {
        self.edges.insert(from, EdgeType::Conditional(router));
        self
    }

    pub fn set_entry_point(mut self, node_id: NodeName) -> Self {
        self.entry_point = Some(node_id);
        self
    }

    /// Validate and freeze the graph
    pub fn build(self) -> Result<StateGraph> {
        let entry = self
            .entry_point
            .ok_or_else(|| BlogError::Workflow("No entry point set".to_string()))?;

        if !self.nodes.contains_key(&entry) {
            return Err(BlogError::Workflow(format!("Entry point node '{}' does not exist", entry)));
        }

        if let Some(id) = self.nodes.keys().find(|id| id.is_virtual()) {
            return Err(BlogError::Workflow(format!("'{}' is virtual and cannot be registered", id)));
        }

        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(BlogError::Workflow(format!("Edge from non-existent node: {}", from)));
            }
            if let EdgeType::Fixed(to) = edge {
                if *to != NodeName::End && !self.nodes.contains_key(to) {
                    return Err(BlogError::Workflow(format!("Edge to non-existent node: {}", to)));
                }
            }
        }

        // Fixed cycles would loop forever; routers are checked at runtime
        if has_fixed_cycle(&self.edges) {
            return Err(BlogError::Workflow("Graph contains a cycle of fixed edges".to_string()));
        }

        tracing::debug!(
            "StateGraph built: {} nodes, {} edges, entry '{}'",
            self.nodes.len(),
            self.edges.len(),
            entry
        );

        Ok(StateGraph {
            nodes: self.nodes,
            edges: self.edges,
            entry_point: entry,
        })
    }
}

impl Default for StateGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn has_fixed_cycle(edges: &HashMap<NodeName, EdgeType>) -> bool {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();

    edges
        .keys()
        .any(|start| dfs_cycle_check(*start, edges, &mut visited, &mut rec_stack))
}

fn dfs_cycle_check(
    node: NodeName,
    edges: &HashMap<NodeName, EdgeType>,
    visited: &mut HashSet<NodeName>,
    rec_stack: &mut HashSet<NodeName>,
) -> bool {
    if rec_stack.contains(&node) {
        return true;
    }
    if !visited.insert(node) {
        return false;
    }

    rec_stack.insert(node);
    let cyclic = match edges.get(&node) {
        Some(EdgeType::Fixed(target)) => dfs_cycle_check(*target, edges, visited, rec_stack),
        _ => false,
    };
    rec_stack.remove(&node);

    cyclic
}
