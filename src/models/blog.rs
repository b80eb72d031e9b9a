use crate::workflow::NodeName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateBlogRequest {
    pub video_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateBlogResponse {
    pub run_id: String,
    pub title: String,
    pub body: String,
    /// Whether the draft went through the revision pass
    pub revised: bool,
    pub path: Vec<NodeName>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}
