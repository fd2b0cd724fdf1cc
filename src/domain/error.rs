use serde::{Deserialize, Serialize};
use std::fmt;

/// A single schema violation, addressed by JSON path (`testCases[2].testCase`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ValidationError(String),
    InvalidDocument(Vec<FieldError>),
    ParseError(String),
    LLMError(String),
    ConfigError(String),
}

impl AppError {
    /// Stable machine-readable kind, used as the `error` field of HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Internal(_) => "internal",
            AppError::ValidationError(_) => "validation",
            AppError::InvalidDocument(_) => "invalid_document",
            AppError::ParseError(_) => "parse",
            AppError::LLMError(_) => "provider",
            AppError::ConfigError(_) => "config",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::InvalidDocument(errors) => {
                write!(f, "Generated document failed validation")?;
                for (index, error) in errors.iter().enumerate() {
                    let sep = if index == 0 { ": " } else { "; " };
                    write!(f, "{}{}", sep, error)?;
                }
                Ok(())
            }
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::LLMError(msg) => write!(f, "LLM error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_document_lists_every_path() {
        let err = AppError::InvalidDocument(vec![
            FieldError::new("ticketSummary.problem", "length", "must not be empty"),
            FieldError::new("testCases[0].format", "enum", "unknown format"),
        ]);
        let text = err.to_string();
        assert!(text.contains("ticketSummary.problem: must not be empty"));
        assert!(text.contains("; testCases[0].format: unknown format"));
        assert_eq!(err.kind(), "invalid_document");
    }

    #[test]
    fn test_root_errors_render_with_placeholder() {
        let error = FieldError::new("", "type", "expected an object");
        assert_eq!(error.to_string(), "<root>: expected an object");
    }
}
