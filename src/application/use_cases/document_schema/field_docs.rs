//! Field descriptions for the QA document and suggestion shapes.
//!
//! Kept apart from the validation walk: nothing here is consulted when checking a
//! value, it only feeds the outline that is sent to the model with each request.

use crate::domain::qa_profile::TestCaseFormat;

pub struct FieldDoc {
    /// Dotted path; `[]` marks "every element of this array".
    pub path: &'static str,
    pub kind: &'static str,
    pub required: bool,
    /// Only set for test case body fields.
    pub format: Option<TestCaseFormat>,
    pub description: &'static str,
}

const fn field(path: &'static str, kind: &'static str, required: bool, description: &'static str) -> FieldDoc {
    FieldDoc {
        path,
        kind,
        required,
        format: None,
        description,
    }
}

const fn body(
    format: TestCaseFormat,
    path: &'static str,
    kind: &'static str,
    required: bool,
    description: &'static str,
) -> FieldDoc {
    FieldDoc {
        path,
        kind,
        required,
        format: Some(format),
        description,
    }
}

pub const DOCUMENT_FIELDS: &[FieldDoc] = &[
    field("ticketSummary", "object", true, "Plain-language digest of the ticket."),
    field("ticketSummary.problem", "string", true, "What is broken or missing, quoting the ticket summary where possible."),
    field("ticketSummary.solution", "string", true, "What the fix or feature is expected to do."),
    field("ticketSummary.context", "string", true, "How the change fits the surrounding system: components, priority, ownership."),
    field("configurationWarnings", "array", true, "Mismatches between ticket content and the QA profile. May be empty."),
    field("configurationWarnings[].type", "category_mismatch | missing_capability | recommendation", true, "Kind of warning."),
    field("configurationWarnings[].title", "string", true, "Short headline."),
    field("configurationWarnings[].message", "string", true, "What was detected."),
    field("configurationWarnings[].recommendation", "string", true, "What the user should change."),
    field("configurationWarnings[].severity", "high | medium | low", false, "Defaults to medium."),
    field("acceptanceCriteria", "array", true, "Discrete, testable requirements. May be empty."),
    field("acceptanceCriteria[].id", "string", true, "Unique within the document, e.g. AC-1."),
    field("acceptanceCriteria[].title", "string", true, "One-line requirement."),
    field("acceptanceCriteria[].description", "string", true, "Observable behaviour that satisfies the requirement."),
    field("acceptanceCriteria[].priority", "must | should | could", false, "Defaults to must."),
    field("acceptanceCriteria[].category", "functional | ui | ux | performance | security | accessibility | api | database", true, "Area the criterion belongs to."),
    field("acceptanceCriteria[].testable", "boolean", false, "Defaults to true."),
    field("testCases", "array", true, "Verification procedures, all in the requested format. May be empty."),
    field("testCases[].format", "gherkin | steps | table", true, "Selects the shape of testCase."),
    field("testCases[].id", "string", true, "Unique within the document, e.g. TC-1."),
    field("testCases[].category", "string", true, "One of the enabled QA categories."),
    field("testCases[].priority", "high | medium | low", false, "Defaults to medium."),
    field("testCases[].estimatedTime", "string", false, "Rough execution time, e.g. 10m."),
    field("testCases[].testCase", "object", true, "Body whose shape depends on format."),
    body(TestCaseFormat::Gherkin, "testCases[].testCase.scenario", "string", true, "Scenario name."),
    body(TestCaseFormat::Gherkin, "testCases[].testCase.given", "string[]", true, "Preconditions, one clause per entry."),
    body(TestCaseFormat::Gherkin, "testCases[].testCase.when", "string[]", true, "Actions."),
    body(TestCaseFormat::Gherkin, "testCases[].testCase.then", "string[]", true, "Expected outcomes."),
    body(TestCaseFormat::Gherkin, "testCases[].testCase.tags", "string[]", false, "Scenario tags without the @ prefix."),
    body(TestCaseFormat::Steps, "testCases[].testCase.title", "string", true, "Test case name."),
    body(TestCaseFormat::Steps, "testCases[].testCase.objective", "string", true, "What the test proves."),
    body(TestCaseFormat::Steps, "testCases[].testCase.preconditions", "string[]", false, "State required before step 1."),
    body(TestCaseFormat::Steps, "testCases[].testCase.steps", "array", true, "Ordered steps."),
    body(TestCaseFormat::Steps, "testCases[].testCase.steps[].stepNumber", "integer", true, "1-based position."),
    body(TestCaseFormat::Steps, "testCases[].testCase.steps[].action", "string", true, "What the tester does."),
    body(TestCaseFormat::Steps, "testCases[].testCase.steps[].expectedResult", "string", true, "What the tester should observe."),
    body(TestCaseFormat::Steps, "testCases[].testCase.steps[].notes", "string", false, "Extra hints."),
    body(TestCaseFormat::Steps, "testCases[].testCase.postconditions", "string[]", false, "Cleanup or final state."),
    body(TestCaseFormat::Table, "testCases[].testCase.title", "string", true, "Test case name."),
    body(TestCaseFormat::Table, "testCases[].testCase.description", "string", true, "What the data set exercises."),
    body(TestCaseFormat::Table, "testCases[].testCase.testData", "array of string-to-string objects", true, "One row per data combination."),
    body(TestCaseFormat::Table, "testCases[].testCase.expectedOutcome", "string", true, "Result expected for every row."),
    body(TestCaseFormat::Table, "testCases[].testCase.notes", "string", false, "Extra hints."),
    field("metadata", "object", true, "Filled in by the server; any value is accepted and replaced."),
];

pub const SUGGESTION_FIELDS: &[FieldDoc] = &[
    field("suggestions", "array", true, "Proposed improvements, best first."),
    field("suggestions[].suggestionType", "edge_case | ui_verification | functional_test | clarification_question | negative_test | performance_test | security_test | accessibility_test | integration_test | data_validation", true, "Kind of improvement."),
    field("suggestions[].title", "string", true, "Short headline."),
    field("suggestions[].description", "string", true, "What to add or ask."),
    field("suggestions[].targetSection", "string", false, "Document section the suggestion applies to, e.g. testCases."),
    field("suggestions[].priority", "high | medium | low", false, "Defaults to medium."),
    field("suggestions[].reasoning", "string", true, "Why the current document needs it."),
    field("suggestions[].implementationHint", "string", false, "How to write the missing test or question."),
    field("suggestions[].relatedRequirements", "string[]", false, "Acceptance criterion ids it relates to."),
    field("suggestions[].estimatedEffort", "low | medium | high", false, "Effort to apply the suggestion."),
    field("suggestions[].tags", "string[]", false, "Free-form labels."),
];

/// Text outline of a field table. Body fields of other test case formats are skipped
/// when `format` is given.
pub fn render_schema_outline(fields: &[FieldDoc], format: Option<TestCaseFormat>) -> String {
    let mut outline = String::new();
    for doc in fields {
        if let (Some(wanted), Some(own)) = (format, doc.format) {
            if wanted != own {
                continue;
            }
        }

        let depth = doc.path.matches('.').count();
        outline.push_str(&"  ".repeat(depth));
        outline.push_str("- ");
        outline.push_str(doc.path);
        outline.push_str(" (");
        outline.push_str(doc.kind);
        if !doc.required {
            outline.push_str(", optional");
        }
        if let Some(own) = doc.format {
            if format.is_none() {
                outline.push_str(&format!(", {} only", own));
            }
        }
        outline.push_str("): ");
        outline.push_str(doc.description);
        outline.push('\n');
    }
    outline
}
