use serde::{Deserialize, Serialize};

use super::rules::{scan, Signal};
use crate::domain::qa_document::{ConfigurationWarning, Severity, WarningType};
use crate::domain::qa_profile::{QaCategory, QaProfile, TestCaseFormat};
use crate::domain::ticket::{IssueKind, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    QaCategoryMismatch,
    FormatRecommendation,
}

impl ConflictKind {
    /// Document-level warning type this analyzer kind is reported as.
    pub fn warning_type(&self) -> WarningType {
        match self {
            ConflictKind::QaCategoryMismatch => WarningType::CategoryMismatch,
            ConflictKind::FormatRecommendation => WarningType::Recommendation,
        }
    }
}

/// A mismatch between what the ticket talks about and what the profile tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationConflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<QaCategory>,
    pub title: String,
    pub message: String,
    pub recommendation: String,
    pub severity: Severity,
}

impl From<ConfigurationConflict> for ConfigurationWarning {
    fn from(conflict: ConfigurationConflict) -> Self {
        ConfigurationWarning {
            warning_type: conflict.kind.warning_type(),
            title: conflict.title,
            message: conflict.message,
            recommendation: conflict.recommendation,
            severity: conflict.severity,
        }
    }
}

struct CategoryRule {
    category: QaCategory,
    signal: Signal,
    include_components: bool,
    severity: Severity,
    title: &'static str,
    message: &'static str,
    recommendation: &'static str,
}

/// Evaluated in order; the output keeps this order.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: QaCategory::Api,
        signal: Signal::Api,
        include_components: false,
        severity: Severity::High,
        title: "API Testing Disabled",
        message: "This ticket involves API changes, but API testing is disabled in your QA profile.",
        recommendation: "Enable the API category to cover request validation, response contracts and status codes.",
    },
    CategoryRule {
        category: QaCategory::Security,
        signal: Signal::Security,
        include_components: false,
        severity: Severity::High,
        title: "Security Testing Disabled",
        message: "This ticket touches authentication or other security-sensitive behaviour, but security testing is disabled in your QA profile.",
        recommendation: "Enable the security category to cover authentication, authorization and credential handling.",
    },
    CategoryRule {
        category: QaCategory::Mobile,
        signal: Signal::Mobile,
        include_components: true,
        severity: Severity::Medium,
        title: "Mobile Testing Disabled",
        message: "This ticket affects mobile devices or layouts, but mobile testing is disabled in your QA profile.",
        recommendation: "Enable the mobile category to cover small viewports, touch interaction and mobile browsers.",
    },
];

/// Warnings for ticket content the profile's enabled categories or format do not cover.
pub fn detect_configuration_conflicts(
    ticket: &Ticket,
    profile: &QaProfile,
) -> Vec<ConfigurationConflict> {
    let text = format!("{}\n{}", ticket.summary, ticket.description);
    let text_scan = scan(&text);
    let component_scan = scan(&ticket.components.join("\n"));

    let mut conflicts = Vec::new();

    for rule in CATEGORY_RULES {
        if profile.qa_categories.is_enabled(rule.category) {
            continue;
        }

        let mut labels = text_scan.labels(rule.signal);
        let mut present = text_scan.is_present(rule.signal);
        if rule.include_components {
            present = present || component_scan.is_present(rule.signal);
            for label in component_scan.labels(rule.signal) {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        if !present {
            continue;
        }

        conflicts.push(ConfigurationConflict {
            kind: ConflictKind::QaCategoryMismatch,
            category: Some(rule.category),
            title: rule.title.to_string(),
            message: format!("{} Detected: {}.", rule.message, labels.join(", ")),
            recommendation: rule.recommendation.to_string(),
            severity: rule.severity,
        });
    }

    if ticket.issue_kind() == IssueKind::Feature
        && profile.test_case_format != TestCaseFormat::Gherkin
    {
        conflicts.push(ConfigurationConflict {
            kind: ConflictKind::FormatRecommendation,
            category: None,
            title: "Gherkin Format Recommended".to_string(),
            message: format!(
                "{} is a user-story style requirement; the profile asks for `{}` test cases.",
                ticket.issue_key, profile.test_case_format
            ),
            recommendation: "Switch the test case format to Gherkin to express behaviour as Given/When/Then scenarios.".to_string(),
            severity: Severity::Low,
        });
    }

    conflicts
}
