// Workflow orchestration - a small LangGraph-style state machine
pub mod state;
pub mod graph;
pub mod executor;
pub mod router;
pub mod blog_workflow;

pub use blog_workflow::{build_blog_workflow, create_blog_workflow_executor, WorkflowOptions};
pub use executor::{ExecutorConfig, WorkflowExecutor};
pub use state::{BlogOutcome, NodeName, WorkflowState};
