use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::qa_profile::{QaProfile, TestCaseFormat};

pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    #[validate(length(min = 1, message = "problem must not be empty"))]
    pub problem: String,
    #[validate(length(min = 1, message = "solution must not be empty"))]
    pub solution: String,
    #[validate(length(min = 1, message = "context must not be empty"))]
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    CategoryMismatch,
    MissingCapability,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationWarning {
    #[serde(rename = "type")]
    pub warning_type: WarningType,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    pub recommendation: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CriterionPriority {
    #[default]
    Must,
    Should,
    Could,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionCategory {
    Functional,
    Ui,
    Ux,
    Performance,
    Security,
    Accessibility,
    Api,
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceCriterion {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: CriterionPriority,
    pub category: CriterionCategory,
    #[serde(default = "default_true")]
    pub testable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GherkinScenario {
    pub scenario: String,
    pub given: Vec<String>,
    pub when: Vec<String>,
    pub then: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub step_number: u32,
    pub action: String,
    pub expected_result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsBody {
    pub title: String,
    pub objective: String,
    #[serde(default)]
    pub preconditions: Vec<String>,
    pub steps: Vec<TestStep>,
    #[serde(default)]
    pub postconditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBody {
    pub title: String,
    pub description: String,
    pub test_data: Vec<BTreeMap<String, String>>,
    pub expected_outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields shared by every test case format; `test_case` carries the format-specific body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseEnvelope<B> {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    pub test_case: B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum TestCase {
    Gherkin(TestCaseEnvelope<GherkinScenario>),
    Steps(TestCaseEnvelope<StepsBody>),
    Table(TestCaseEnvelope<TableBody>),
}

impl TestCase {
    pub fn format(&self) -> TestCaseFormat {
        match self {
            TestCase::Gherkin(_) => TestCaseFormat::Gherkin,
            TestCase::Steps(_) => TestCaseFormat::Steps,
            TestCase::Table(_) => TestCaseFormat::Table,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TestCase::Gherkin(case) => &case.id,
            TestCase::Steps(case) => &case.id,
            TestCase::Table(case) => &case.id,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            TestCase::Gherkin(case) => &case.category,
            TestCase::Steps(case) => &case.category,
            TestCase::Table(case) => &case.category,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            TestCase::Gherkin(case) => &case.test_case.scenario,
            TestCase::Steps(case) => &case.test_case.title,
            TestCase::Table(case) => &case.test_case.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub generated_at: DateTime<Utc>,
    pub qa_profile: QaProfile,
    #[validate(length(min = 1, message = "ticket id must not be empty"))]
    pub ticket_id: String,
    #[serde(default = "default_document_version")]
    pub document_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_reason: Option<String>,
}

fn default_document_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// The generated QA artifact. Built once per analysis request, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaCanvasDocument {
    pub ticket_summary: TicketSummary,
    pub configuration_warnings: Vec<ConfigurationWarning>,
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    pub test_cases: Vec<TestCase>,
    pub metadata: DocumentMetadata,
}
