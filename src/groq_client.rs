use crate::config::Config;
use crate::error::{BlogError, Result};
use crate::llm::LanguageModel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Chat completion client for Groq's OpenAI-compatible API
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self { role: "system".to_string(), content: content.to_string() }
    }

    pub fn user(content: &str) -> Self {
        Self { role: "user".to_string(), content: content.to_string() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting. Providers that omit a counter report it as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the model produced any
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: crate::config::DEFAULT_GROQ_BASE_URL.to_string(),
            model: crate::config::DEFAULT_GROQ_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.groq_api_key.clone())
            .with_model(&config.groq_model)
            .with_base_url(&config.groq_base_url)
            .with_timeout(config.llm_timeout)
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system: &str, user: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: Some(0.7),
        }
    }

    /// Send one chat completion request. A single attempt, bounded by the
    /// configured timeout.
    pub async fn generate_content(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            prompt_chars = request.messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Groq API request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BlogError::ModelInvocation(format!("Request timed out after {}s", self.timeout.as_secs()))
                } else {
                    BlogError::ModelInvocation(format!("Request error: {}", e))
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| BlogError::ModelInvocation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!("Groq API error ({}): {}", status, response_text);
            return Err(BlogError::ModelInvocation(format!("API error ({}): {}", status, response_text)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_text).map_err(|e| {
            BlogError::ModelInvocation(format!(
                "Failed to parse response: {} ({} bytes)",
                e,
                response_text.len()
            ))
        })?;

        tracing::debug!(
            id = parsed.id.as_deref().unwrap_or("-"),
            model = parsed.model.as_deref().unwrap_or(&request.model),
            finish_reason = parsed.choices.first().and_then(|c| c.finish_reason.as_deref()).unwrap_or("-"),
            response_chars = parsed.first_text().map_or(0, str::len),
            "Groq API response"
        );

        if let Some(ref usage) = parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Groq API usage"
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user);
        let response = self.generate_content(&request).await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| BlogError::ModelInvocation("No text content in Groq response".to_string()))
    }
}
