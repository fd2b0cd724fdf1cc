use serde::Serialize;

use crate::application::use_cases::ticket_analysis::generate_test_case_categories;
use crate::domain::qa_document::{QaCanvasDocument, Severity};
use crate::domain::qa_profile::{QaCategory, TestCaseFormat};

/// What an existing document already covers, measured against its own profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub ticket_id: String,
    pub format: TestCaseFormat,
    pub enabled_categories: Vec<QaCategory>,
    pub uncovered_categories: Vec<QaCategory>,
    pub acceptance_criteria: usize,
    pub untestable_criteria: usize,
    pub test_cases: usize,
    pub high_severity_warnings: usize,
}

pub fn summarize_coverage(document: &QaCanvasDocument) -> CoverageSummary {
    let enabled_categories = generate_test_case_categories(&document.metadata.qa_profile);
    let uncovered_categories = enabled_categories
        .iter()
        .copied()
        .filter(|category| {
            !document
                .test_cases
                .iter()
                .any(|case| case.category().trim().eq_ignore_ascii_case(category.as_str()))
        })
        .collect();

    CoverageSummary {
        ticket_id: document.metadata.ticket_id.clone(),
        format: document.metadata.qa_profile.test_case_format,
        enabled_categories,
        uncovered_categories,
        acceptance_criteria: document.acceptance_criteria.len(),
        untestable_criteria: document
            .acceptance_criteria
            .iter()
            .filter(|criterion| !criterion.testable)
            .count(),
        test_cases: document.test_cases.len(),
        high_severity_warnings: document
            .configuration_warnings
            .iter()
            .filter(|warning| warning.severity == Severity::High)
            .count(),
    }
}

impl CoverageSummary {
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{}: {} acceptance {}, {} test {} in {} format.",
            self.ticket_id,
            self.acceptance_criteria,
            plural(self.acceptance_criteria, "criterion", "criteria"),
            self.test_cases,
            plural(self.test_cases, "case", "cases"),
            self.format
        );

        if self.uncovered_categories.is_empty() {
            text.push_str(" Every enabled category has at least one test case.");
        } else {
            let names: Vec<&str> = self.uncovered_categories.iter().map(|c| c.as_str()).collect();
            text.push_str(&format!(
                " Enabled categories without test cases: {}.",
                names.join(", ")
            ));
        }
        if self.untestable_criteria > 0 {
            text.push_str(&format!(
                " {} acceptance {} marked untestable.",
                self.untestable_criteria,
                plural(self.untestable_criteria, "criterion is", "criteria are")
            ));
        }
        if self.high_severity_warnings > 0 {
            text.push_str(&format!(
                " {} high-severity configuration {} open.",
                self.high_severity_warnings,
                plural(self.high_severity_warnings, "warning is", "warnings are")
            ));
        }
        text
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::document_schema::tests::sample_document_value;
    use crate::application::use_cases::document_schema::validate_qa_canvas_document;

    fn sample() -> QaCanvasDocument {
        validate_qa_canvas_document(&sample_document_value()).unwrap()
    }

    #[test]
    fn test_finds_enabled_categories_without_cases() {
        let coverage = summarize_coverage(&sample());
        assert_eq!(
            coverage.enabled_categories,
            vec![QaCategory::Functional, QaCategory::Ux, QaCategory::Ui, QaCategory::Negative]
        );
        assert_eq!(
            coverage.uncovered_categories,
            vec![QaCategory::Ux, QaCategory::Ui, QaCategory::Negative]
        );
        assert_eq!(coverage.acceptance_criteria, 2);
        assert_eq!(coverage.test_cases, 1);
        assert_eq!(coverage.high_severity_warnings, 0);
    }

    #[test]
    fn test_describe_reads_naturally() {
        let text = summarize_coverage(&sample()).describe();
        assert!(text.starts_with("MOB-42: 2 acceptance criteria, 1 test case in gherkin format."));
        assert!(text.contains("without test cases: ux, ui, negative."));
    }

    #[test]
    fn test_fully_covered_document() {
        let mut document = sample();
        document.metadata.qa_profile.qa_categories =
            crate::domain::qa_profile::QaCategories::all(false);
        document.metadata.qa_profile.qa_categories.functional = true;
        document.acceptance_criteria[0].testable = false;

        let coverage = summarize_coverage(&document);
        assert!(coverage.uncovered_categories.is_empty());
        let text = coverage.describe();
        assert!(text.contains("Every enabled category has at least one test case."));
        assert!(text.contains("1 acceptance criterion is marked untestable."));
    }
}
