// Runtime configuration loaded from the environment (and `.env` via dotenvy)
use crate::error::{BlogError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GROQ_MODEL: &str = "qwen-2.5-32b";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// What to do when the scoring response cannot be parsed as JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreParsePolicy {
    /// Abort the run with `BlogError::ScoringParse`
    Fatal,
    /// Log the problem and treat the draft as failing the quality gate
    TreatAsFail,
}

impl FromStr for ScoreParsePolicy {
    type Err = BlogError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(ScoreParsePolicy::Fatal),
            "fail" | "treat_as_fail" => Ok(ScoreParsePolicy::TreatAsFail),
            other => Err(BlogError::Configuration(format!(
                "SCORE_PARSE_POLICY must be 'fatal' or 'fail', got '{}'",
                other
            ))),
        }
    }
}

/// What to do after the transcript step produced an error marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptErrorPolicy {
    /// Route straight to End, no model calls are made
    ShortCircuit,
    /// Keep drafting from the error marker text
    Continue,
}

impl FromStr for TranscriptErrorPolicy {
    type Err = BlogError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short_circuit" | "stop" => Ok(TranscriptErrorPolicy::ShortCircuit),
            "continue" => Ok(TranscriptErrorPolicy::Continue),
            other => Err(BlogError::Configuration(format!(
                "TRANSCRIPT_ERROR_POLICY must be 'short_circuit' or 'continue', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_base_url: String,
    pub llm_timeout: Duration,
    pub node_timeout_seconds: u64,
    pub transcript_languages: Vec<String>,
    pub score_parse_policy: ScoreParsePolicy,
    pub transcript_error_policy: TranscriptErrorPolicy,
    pub bind_addr: String,
}

// Keeps the API key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("groq_api_key", &"<redacted>")
            .field("groq_model", &self.groq_model)
            .field("groq_base_url", &self.groq_base_url)
            .field("llm_timeout", &self.llm_timeout)
            .field("node_timeout_seconds", &self.node_timeout_seconds)
            .field("transcript_languages", &self.transcript_languages)
            .field("score_parse_policy", &self.score_parse_policy)
            .field("transcript_error_policy", &self.transcript_error_policy)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Config {
    /// Read configuration from process environment variables.
    ///
    /// Fails fast when `GROQ_API_KEY` is missing so the problem surfaces at
    /// startup instead of inside the first model call.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let groq_api_key = non_empty("GROQ_API_KEY").ok_or_else(|| {
            BlogError::Configuration(
                "GROQ_API_KEY is not set. Add it to the environment or a .env file".to_string(),
            )
        })?;

        let llm_timeout_seconds = parse_seconds(non_empty("LLM_TIMEOUT_SECONDS"), "LLM_TIMEOUT_SECONDS", 120)?;
        let node_timeout_seconds = parse_seconds(non_empty("NODE_TIMEOUT_SECONDS"), "NODE_TIMEOUT_SECONDS", 300)?;

        let transcript_languages = non_empty("TRANSCRIPT_LANGUAGES")
            .map(|raw| {
                raw.split(',')
                    .map(|lang| lang.trim().to_string())
                    .filter(|lang| !lang.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|langs| !langs.is_empty())
            .unwrap_or_else(|| vec!["en".to_string()]);

        let score_parse_policy = match non_empty("SCORE_PARSE_POLICY") {
            Some(raw) => raw.parse()?,
            None => ScoreParsePolicy::Fatal,
        };

        let transcript_error_policy = match non_empty("TRANSCRIPT_ERROR_POLICY") {
            Some(raw) => raw.parse()?,
            None => TranscriptErrorPolicy::ShortCircuit,
        };

        Ok(Self {
            groq_api_key,
            groq_model: non_empty("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            groq_base_url: non_empty("GROQ_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(llm_timeout_seconds),
            node_timeout_seconds,
            transcript_languages,
            score_parse_policy,
            transcript_error_policy,
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

fn parse_seconds(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(0) => Err(BlogError::Configuration(format!("{} must be greater than zero", key))),
            Ok(seconds) => Ok(seconds),
            Err(_) => Err(BlogError::Configuration(format!(
                "{} must be a whole number of seconds, got '{}'",
                key, value
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, BlogError::Configuration(ref msg) if msg.contains("GROQ_API_KEY")));

        let err = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, BlogError::Configuration(_)));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.groq_model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.groq_base_url, DEFAULT_GROQ_BASE_URL);
        assert_eq!(config.llm_timeout, Duration::from_secs(120));
        assert_eq!(config.node_timeout_seconds, 300);
        assert_eq!(config.transcript_languages, vec!["en".to_string()]);
        assert_eq!(config.score_parse_policy, ScoreParsePolicy::Fatal);
        assert_eq!(config.transcript_error_policy, TranscriptErrorPolicy::ShortCircuit);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("GROQ_MODEL", "llama-3.3-70b-versatile"),
            ("GROQ_BASE_URL", "http://localhost:8080/v1/"),
            ("LLM_TIMEOUT_SECONDS", "30"),
            ("TRANSCRIPT_LANGUAGES", "es, en ,"),
            ("SCORE_PARSE_POLICY", "fail"),
            ("TRANSCRIPT_ERROR_POLICY", "continue"),
        ]))
        .unwrap();

        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
        assert_eq!(config.groq_base_url, "http://localhost:8080/v1");
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.transcript_languages, vec!["es".to_string(), "en".to_string()]);
        assert_eq!(config.score_parse_policy, ScoreParsePolicy::TreatAsFail);
        assert_eq!(config.transcript_error_policy, TranscriptErrorPolicy::Continue);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("NODE_TIMEOUT_SECONDS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("NODE_TIMEOUT_SECONDS"));

        let err = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("LLM_TIMEOUT_SECONDS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LLM_TIMEOUT_SECONDS"));

        let err = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("SCORE_PARSE_POLICY", "maybe"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SCORE_PARSE_POLICY"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_secret")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
