// Narrow adapters over free-form model output
use crate::error::{BlogError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCORE_FIELD: &str = "overall_score";

/// A title line plus whatever followed it.
///
/// `body` is `None` when the model answered with a single line; callers keep
/// their previous body in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftText {
    pub title: String,
    pub body: Option<String>,
}

/// Split a model response at its first line break
pub fn split_title_body(response: &str) -> DraftText {
    match response.split_once('\n') {
        Some((title, body)) => DraftText {
            title: title.to_string(),
            body: Some(body.to_string()),
        },
        None => DraftText {
            title: response.to_string(),
            body: None,
        },
    }
}

/// Read `overall_score` from a scoring response.
///
/// Responses wrapped in a Markdown code fence are unwrapped to their outermost
/// `{...}` first. A missing or null score counts as 0.
pub fn parse_score(response: &str) -> Result<f64> {
    let json_str = extract_json_object(response);

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        BlogError::ScoringParse(format!(
            "response is not valid JSON ({}); got {} chars",
            e,
            response.len()
        ))
    })?;

    let object = value.as_object().ok_or_else(|| {
        BlogError::ScoringParse(format!("expected a JSON object, got {}", json_kind(&value)))
    })?;

    match object.get(SCORE_FIELD) {
        None | Some(Value::Null) => Ok(0.0),
        Some(score) => score.as_f64().ok_or_else(|| {
            BlogError::ScoringParse(format!("`{}` is not a number: {}", SCORE_FIELD, score))
        }),
    }
}

fn extract_json_object(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.contains("```") {
        return trimmed;
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
