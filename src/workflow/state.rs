// WorkflowState - the single record threaded through every node of a run
use crate::agent::DraftText;
use crate::youtube_transcript::TranscriptResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Nodes of the blog graph. `Start` and `End` are virtual: they mark the
/// boundaries of a run and never execute anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeName {
    Start,
    Transcriptor,
    Blogger,
    Reviewer,
    End,
}

impl NodeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeName::Start => "start",
            NodeName::Transcriptor => "transcriptor",
            NodeName::Blogger => "blogger",
            NodeName::Reviewer => "reviewer",
            NodeName::End => "end",
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, NodeName::Start | NodeName::End)
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Initializing,
    Running,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Unique id for log correlation
    pub run_id: String,

    pub video_url: String,

    /// Set by the transcriptor; either text or an error marker
    pub transcript: Option<TranscriptResult>,

    pub blog_title: Option<String>,
    pub blog: Option<String>,

    pub current_node: NodeName,
    pub status: WorkflowStatus,

    /// Nodes entered so far, `Start` first
    pub path: Vec<NodeName>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a finished run hands back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BlogOutcome {
    TranscriptFailed { error: String },
    Published { title: String, body: String },
}

impl WorkflowState {
    pub fn new(video_url: &str) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4().to_string(),
            video_url: video_url.to_string(),
            transcript: None,
            blog_title: None,
            blog: None,
            current_node: NodeName::Start,
            status: WorkflowStatus::Initializing,
            path: vec![NodeName::Start],
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a node's update. Fields left as `None` keep their current value.
    pub fn apply_update(&mut self, update: StateUpdate) {
        self.updated_at = Utc::now();

        if let Some(transcript) = update.transcript {
            self.transcript = Some(transcript);
        }
        if let Some(title) = update.blog_title {
            self.blog_title = Some(title);
        }
        if let Some(blog) = update.blog {
            self.blog = Some(blog);
        }
    }

    pub fn enter_node(&mut self, node: NodeName) {
        self.current_node = node;
        self.path.push(node);
        self.updated_at = Utc::now();
    }

    pub fn transcript_failed(&self) -> bool {
        self.transcript.as_ref().map_or(false, TranscriptResult::is_error)
    }

    /// Text handed to the scorer and the reviser: the body, or the title when
    /// a single-line response never set one
    pub fn review_input(&self) -> Option<&str> {
        self.blog.as_deref().or(self.blog_title.as_deref())
    }

    pub fn visited(&self, node: NodeName) -> bool {
        self.path.contains(&node)
    }

    /// Summarise a finished run. `None` until a transcript error or a title
    /// exists.
    pub fn outcome(&self) -> Option<BlogOutcome> {
        if let Some(marker) = self.transcript.as_ref().and_then(TranscriptResult::error_marker) {
            return Some(BlogOutcome::TranscriptFailed { error: marker });
        }

        let title = self.blog_title.clone()?;
        let body = self.blog.clone().unwrap_or_else(|| title.clone());
        Some(BlogOutcome::Published { title, body })
    }
}

/// State update payload returned by nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub transcript: Option<TranscriptResult>,
    pub blog_title: Option<String>,
    pub blog: Option<String>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcript(mut self, transcript: TranscriptResult) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Title always updates; body only when the response had one
    pub fn with_draft(mut self, draft: DraftText) -> Self {
        self.blog_title = Some(draft.title);
        self.blog = draft.body;
        self
    }
}
