// Transcript fetching - video id extraction, caption source port, YouTube adapter
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use yt_transcript_rs::api::YouTubeTranscriptApi;

const VIDEO_ID_MARKER: &str = "v=";

/// Pull the video id out of a watch URL.
///
/// Takes whatever follows the first `v=` and cuts it at the next `&`. Inputs
/// without the marker are passed through whole, so a bare id works too.
/// Nothing is validated here; a bad id surfaces as a transcript error.
pub fn extract_video_id(video_url: &str) -> &str {
    let after_marker = match video_url.find(VIDEO_ID_MARKER) {
        Some(index) => &video_url[index + VIDEO_ID_MARKER.len()..],
        None => video_url,
    };

    match after_marker.find('&') {
        Some(end) => &after_marker[..end],
        None => after_marker,
    }
}

/// Outcome of the transcript step. Failures are data, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TranscriptResult {
    Text(String),
    Error(String),
}

impl TranscriptResult {
    pub fn is_error(&self) -> bool {
        matches!(self, TranscriptResult::Error(_))
    }

    /// Human readable marker, e.g. `Error: no captions`
    pub fn error_marker(&self) -> Option<String> {
        match self {
            TranscriptResult::Text(_) => None,
            TranscriptResult::Error(message) => Some(format!("Error: {}", message)),
        }
    }
}

impl fmt::Display for TranscriptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptResult::Text(text) => f.write_str(text),
            TranscriptResult::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    pub text: String,
}

/// Anything that can list the caption fragments of a video, in playback order
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_fragments(&self, video_id: &str) -> Result<Vec<CaptionFragment>, String>;
}

/// Caption source backed by YouTube's public transcript endpoints
#[derive(Debug, Clone)]
pub struct YouTubeTranscriptSource {
    languages: Vec<String>,
    preserve_formatting: bool,
}

impl YouTubeTranscriptSource {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            preserve_formatting: false,
        }
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptSource {
    async fn fetch_fragments(&self, video_id: &str) -> Result<Vec<CaptionFragment>, String> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| format!("Failed to initialise transcript client: {}", e))?;

        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let transcript = api
            .fetch_transcript(video_id, &languages, self.preserve_formatting)
            .await
            .map_err(|e| e.to_string())?;

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| CaptionFragment { text: snippet.text })
            .collect())
    }
}

/// Turns a video reference into transcript text, never failing outright
#[derive(Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, video_url: &str) -> TranscriptResult {
        let video_id = extract_video_id(video_url);
        tracing::info!(video_id = %video_id, "Fetching transcript");

        match self.source.fetch_fragments(video_id).await {
            Ok(fragments) if fragments.is_empty() => {
                tracing::warn!(video_id = %video_id, "Transcript source returned no captions");
                TranscriptResult::Error(format!("No captions available for video {}", video_id))
            }
            Ok(fragments) => {
                let text = fragments
                    .iter()
                    .map(|fragment| fragment.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                tracing::info!(
                    video_id = %video_id,
                    fragments = fragments.len(),
                    chars = text.len(),
                    "Transcript fetched"
                );
                TranscriptResult::Text(text)
            }
            Err(e) => {
                tracing::warn!(video_id = %video_id, "Transcript fetch failed: {}", e);
                TranscriptResult::Error(e)
            }
        }
    }
}
