use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::error::{AppError, Result};
use crate::shared::text::preview_text;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static INTERNAL_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<internal>[\s\S]*?</internal>").unwrap());

static CODE_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[a-zA-Z]*\s*\n?(.*?)```").unwrap());

/// Removes reasoning blocks some models emit before the answer.
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = INTERNAL_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned.trim().to_string()
}

/// The JSON text inside a model answer: a raw chat-completions envelope is unwrapped,
/// then the first fenced block wins, then the outermost `{...}` span.
pub fn extract_json_payload(output: &str) -> String {
    let trimmed = output.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(content) = value
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
        {
            return extract_json_payload(content);
        }
        return trimmed.to_string();
    }

    if let Some(inner) = CODE_FENCE_PATTERN
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
    {
        return inner.as_str().trim().to_string();
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Clean, extract and parse a model answer that must be a JSON object.
pub fn parse_json_object(output: &str) -> Result<Value> {
    let payload = extract_json_payload(&clean_llm_response(output));
    let value: Value = serde_json::from_str(&payload).map_err(|e| {
        AppError::ParseError(format!(
            "Model output is not valid JSON ({}): {}",
            e,
            preview_text(&payload, 200)
        ))
    })?;

    if !value.is_object() {
        return Err(AppError::ParseError(format!(
            "Model output is JSON but not an object: {}",
            preview_text(&payload, 200)
        )));
    }
    Ok(value)
}
