use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::qa_document::{Priority, QaCanvasDocument};
use super::ticket::Ticket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    EdgeCase,
    UiVerification,
    FunctionalTest,
    ClarificationQuestion,
    NegativeTest,
    PerformanceTest,
    SecurityTest,
    AccessibilityTest,
    IntegrationTest,
    DataValidation,
}

impl SuggestionType {
    pub const ALL: [SuggestionType; 10] = [
        SuggestionType::EdgeCase,
        SuggestionType::UiVerification,
        SuggestionType::FunctionalTest,
        SuggestionType::ClarificationQuestion,
        SuggestionType::NegativeTest,
        SuggestionType::PerformanceTest,
        SuggestionType::SecurityTest,
        SuggestionType::AccessibilityTest,
        SuggestionType::IntegrationTest,
        SuggestionType::DataValidation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionType::EdgeCase => "edge_case",
            SuggestionType::UiVerification => "ui_verification",
            SuggestionType::FunctionalTest => "functional_test",
            SuggestionType::ClarificationQuestion => "clarification_question",
            SuggestionType::NegativeTest => "negative_test",
            SuggestionType::PerformanceTest => "performance_test",
            SuggestionType::SecurityTest => "security_test",
            SuggestionType::AccessibilityTest => "accessibility_test",
            SuggestionType::IntegrationTest => "integration_test",
            SuggestionType::DataValidation => "data_validation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// An incremental improvement proposed for an existing document. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaSuggestion {
    #[serde(default)]
    pub id: String,
    pub suggestion_type: SuggestionType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_section: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_hint: Option<String>,
    #[serde(default)]
    pub related_requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_effort: Option<Effort>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub current_document: QaCanvasDocument,
    #[serde(default = "default_max_suggestions")]
    #[validate(range(min = 1, max = 10, message = "maxSuggestions must be between 1 and 10"))]
    pub max_suggestions: u32,
    #[serde(default)]
    pub focus_areas: Vec<SuggestionType>,
    #[serde(default)]
    pub exclude_types: Vec<SuggestionType>,
    #[serde(default)]
    pub ticket_json: Option<Ticket>,
}

pub const DEFAULT_MAX_SUGGESTIONS: u32 = 3;

fn default_max_suggestions() -> u32 {
    DEFAULT_MAX_SUGGESTIONS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggestions: Vec<QaSuggestion>,
    pub total_count: usize,
    pub generated_at: DateTime<Utc>,
    pub context_summary: String,
}
