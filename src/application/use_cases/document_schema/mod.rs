//! Structural contract of every JSON payload the service accepts or produces.
//!
//! Validation never fails hard: each entry point returns the typed value or the
//! full list of field errors found, addressed by JSON path.

pub mod field_docs;
mod walker;


use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::domain::analysis::AnalysisRequest;
use crate::domain::error::FieldError;
use crate::domain::qa_document::{
    AcceptanceCriterion, ConfigurationWarning, DocumentMetadata, GherkinScenario,
    Priority, QaCanvasDocument, StepsBody, TableBody, TestCase, TestCaseEnvelope, TicketSummary,
    DOCUMENT_VERSION,
};
use crate::domain::qa_profile::{OperationMode, QaCategory, QaProfile, TestCaseFormat};
use crate::domain::qa_suggestion::{SuggestionRequest, SuggestionType};
use crate::domain::ticket::Ticket;
use walker::{index, join, kind_name, SchemaWalker};

pub use field_docs::{render_schema_outline, FieldDoc, DOCUMENT_FIELDS, SUGGESTION_FIELDS};

pub type Validation<T> = std::result::Result<T, Vec<FieldError>>;

const PROFILE_FLAGS: [&str; 4] = ["autoRefresh", "includeComments", "includeImages", "showNotifications"];

pub fn validate_qa_canvas_document(candidate: &Value) -> Validation<QaCanvasDocument> {
    let mut walker = SchemaWalker::default();
    let document = walk_document(&mut walker, "", candidate);
    walker.finish(document)
}

pub fn validate_qa_profile(candidate: &Value) -> Validation<QaProfile> {
    let mut walker = SchemaWalker::default();
    let profile = walk_profile(&mut walker, "", candidate);
    walker.finish(profile)
}

pub fn validate_ticket(candidate: &Value) -> Validation<Ticket> {
    let mut walker = SchemaWalker::default();
    let ticket = walk_ticket(&mut walker, "", candidate);
    walker.finish(ticket)
}

pub fn validate_analysis_request(candidate: &Value) -> Validation<AnalysisRequest> {
    let mut walker = SchemaWalker::default();
    let request = walk_analysis_request(&mut walker, candidate);
    walker.finish(request)
}

pub fn validate_suggestion_request(candidate: &Value) -> Validation<SuggestionRequest> {
    let mut walker = SchemaWalker::default();
    let request = walk_suggestion_request(&mut walker, candidate);
    walker.finish(request)
}

/// A document with every required field present and every collection empty.
///
/// Used when generation cannot produce a valid document; always passes
/// [`validate_qa_canvas_document`].
pub fn create_minimal_document(ticket_id: &str, profile: &QaProfile) -> QaCanvasDocument {
    let ticket_id = if ticket_id.trim().is_empty() {
        "UNKNOWN"
    } else {
        ticket_id
    };

    QaCanvasDocument {
        ticket_summary: TicketSummary {
            problem: format!("No analysis is available for {} yet.", ticket_id),
            solution: "Review the ticket manually or regenerate the document.".to_string(),
            context: "Generated as a placeholder because a full QA document could not be produced.".to_string(),
        },
        configuration_warnings: Vec::new(),
        acceptance_criteria: Vec::new(),
        test_cases: Vec::new(),
        metadata: DocumentMetadata {
            generated_at: Utc::now(),
            qa_profile: profile.clone(),
            ticket_id: ticket_id.to_string(),
            document_version: DOCUMENT_VERSION.to_string(),
            ai_model: None,
            generation_time: None,
            word_count: None,
            regeneration_reason: None,
        },
    }
}

fn walk_document(walker: &mut SchemaWalker, path: &str, value: &Value) -> Option<QaCanvasDocument> {
    let map = walker.object(path, value)?;
    let mark = walker.mark();

    if let Some(summary) = walker.required(path, map, "ticketSummary") {
        let summary_path = join(path, "ticketSummary");
        if let Some(summary) = walker.decode::<TicketSummary>(&summary_path, summary) {
            walker.check(&summary_path, &summary);
        }
    }

    let warnings_path = join(path, "configurationWarnings");
    if let Some(items) = walker.required_array(path, map, "configurationWarnings") {
        for (i, item) in items.iter().enumerate() {
            let item_path = index(&warnings_path, i);
            if let Some(warning) = walker.decode::<ConfigurationWarning>(&item_path, item) {
                walker.check(&item_path, &warning);
            }
        }
    }

    let criteria_path = join(path, "acceptanceCriteria");
    if let Some(items) = walker.required_array(path, map, "acceptanceCriteria") {
        let mut ids = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let item_path = index(&criteria_path, i);
            if let Some(criterion) = walker.decode::<AcceptanceCriterion>(&item_path, item) {
                walker.check(&item_path, &criterion);
                ids.push((i, criterion.id));
            }
        }
        check_unique_ids(walker, &criteria_path, &ids);
    }

    let cases_path = join(path, "testCases");
    if let Some(items) = walker.required_array(path, map, "testCases") {
        let mut ids = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if let Some(case) = walk_test_case(walker, &index(&cases_path, i), item) {
                ids.push((i, case.id().to_string()));
            }
        }
        check_unique_ids(walker, &cases_path, &ids);
    }

    if let Some(metadata) = walker.required(path, map, "metadata") {
        walk_metadata(walker, &join(path, "metadata"), metadata);
    }

    if !walker.clean_since(mark) {
        return None;
    }
    walker.decode(path, value)
}

/// Format first, then the shared envelope, then the body against the format's shape.
fn walk_test_case(walker: &mut SchemaWalker, path: &str, value: &Value) -> Option<TestCase> {
    let map = walker.object(path, value)?;

    let format_value = walker.required(path, map, "format")?;
    let format = walker.decode::<TestCaseFormat>(&join(path, "format"), format_value)?;
    if let Some(priority) = map.get("priority") {
        walker.decode::<Priority>(&join(path, "priority"), priority)?;
    }

    let envelope = walker.decode::<TestCaseEnvelope<Value>>(path, value)?;
    if envelope.id.trim().is_empty() {
        walker.push(join(path, "id"), "length", "id must not be empty");
        return None;
    }

    let body_path = join(path, "testCase");
    if let Err(err) = decode_body(format, &envelope.test_case) {
        let mut message = format!("does not match the `{}` body shape: {}", format, err);
        if let Some(other) = matching_format(&envelope.test_case) {
            message.push_str(&format!(" (the body has the `{}` shape)", other));
        }
        walker.push(body_path, "format_mismatch", message);
        return None;
    }

    walker.decode(path, value)
}

fn decode_body(format: TestCaseFormat, body: &Value) -> Result<(), serde_json::Error> {
    match format {
        TestCaseFormat::Gherkin => serde_json::from_value::<GherkinScenario>(body.clone()).map(|_| ()),
        TestCaseFormat::Steps => serde_json::from_value::<StepsBody>(body.clone()).map(|_| ()),
        TestCaseFormat::Table => serde_json::from_value::<TableBody>(body.clone()).map(|_| ()),
    }
}

fn matching_format(body: &Value) -> Option<TestCaseFormat> {
    TestCaseFormat::ALL
        .into_iter()
        .find(|format| decode_body(*format, body).is_ok())
}

fn check_unique_ids(walker: &mut SchemaWalker, path: &str, ids: &[(usize, String)]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, id) in ids {
        match seen.get(id.as_str()) {
            Some(first) => walker.push(
                join(&index(path, *i), "id"),
                "duplicate",
                format!("duplicate id `{}` (first used at {})", id, index(path, *first)),
            ),
            None => {
                seen.insert(id.as_str(), *i);
            }
        }
    }
}

fn walk_metadata(walker: &mut SchemaWalker, path: &str, value: &Value) {
    let Some(map) = walker.object(path, value) else {
        return;
    };
    let mark = walker.mark();
    if let Some(profile) = map.get("qaProfile") {
        walk_profile(walker, &join(path, "qaProfile"), profile);
    }
    if !walker.clean_since(mark) {
        return;
    }
    if let Some(metadata) = walker.decode::<DocumentMetadata>(path, value) {
        walker.check(path, &metadata);
    }
}

fn walk_profile(walker: &mut SchemaWalker, path: &str, value: &Value) -> Option<QaProfile> {
    let map = walker.object(path, value)?;
    let mark = walker.mark();

    if let Some(categories) = walker.required(path, map, "qaCategories") {
        let categories_path = join(path, "qaCategories");
        if let Some(flags) = walker.object(&categories_path, categories) {
            walk_category_flags(walker, &categories_path, flags);
        }
    }

    if let Some(format) = walker.required(path, map, "testCaseFormat") {
        walker.decode::<TestCaseFormat>(&join(path, "testCaseFormat"), format);
    }

    for flag in PROFILE_FLAGS {
        match map.get(flag) {
            None | Some(Value::Bool(_)) => {}
            Some(other) => walker.push(
                join(path, flag),
                "type",
                format!("expected a boolean, found {}", kind_name(other)),
            ),
        }
    }
    if let Some(mode) = map.get("operationMode") {
        walker.decode::<OperationMode>(&join(path, "operationMode"), mode);
    }

    if !walker.clean_since(mark) {
        return None;
    }
    walker.decode(path, value)
}

fn walk_category_flags(walker: &mut SchemaWalker, path: &str, flags: &Map<String, Value>) {
    for category in QaCategory::ALL {
        let key = category.as_str();
        match flags.get(key) {
            Some(Value::Bool(_)) => {}
            Some(other) => walker.push(
                join(path, key),
                "type",
                format!("expected a boolean, found {}", kind_name(other)),
            ),
            None => walker.push(
                join(path, key),
                "required",
                format!("missing required category flag `{}`", key),
            ),
        }
    }
}

fn walk_ticket(walker: &mut SchemaWalker, path: &str, value: &Value) -> Option<Ticket> {
    walker.object(path, value)?;
    let ticket = walker.decode::<Ticket>(path, value)?;
    let mark = walker.mark();
    walker.check(path, &ticket);
    walker.clean_since(mark).then_some(ticket)
}

fn walk_analysis_request(walker: &mut SchemaWalker, value: &Value) -> Option<AnalysisRequest> {
    let map = walker.object("", value)?;
    let mark = walker.mark();

    if let Some(profile) = walker.required("", map, "qaProfile") {
        walk_profile(walker, "qaProfile", profile);
    }
    if let Some(ticket) = walker.required("", map, "ticketJson") {
        walk_ticket(walker, "ticketJson", ticket);
    }
    match map.get("regenerationReason") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => walker.push(
            "regenerationReason",
            "type",
            format!("expected a string, found {}", kind_name(other)),
        ),
    }

    if !walker.clean_since(mark) {
        return None;
    }
    walker.decode("", value)
}

fn walk_suggestion_request(walker: &mut SchemaWalker, value: &Value) -> Option<SuggestionRequest> {
    let map = walker.object("", value)?;
    let mark = walker.mark();

    if let Some(document) = walker.required("", map, "currentDocument") {
        walk_document(walker, "currentDocument", document);
    }
    if let Some(max) = map.get("maxSuggestions") {
        walker.decode::<u32>("maxSuggestions", max);
    }
    for key in ["focusAreas", "excludeTypes"] {
        let Some(items) = map.get(key) else {
            continue;
        };
        if let Some(items) = walker.array(key, items) {
            for (i, item) in items.iter().enumerate() {
                walker.decode::<SuggestionType>(&index(key, i), item);
            }
        }
    }
    match map.get("ticketJson") {
        None | Some(Value::Null) => {}
        Some(ticket) => {
            walk_ticket(walker, "ticketJson", ticket);
        }
    }

    if !walker.clean_since(mark) {
        return None;
    }
    let request = walker.decode::<SuggestionRequest>("", value)?;
    let mark = walker.mark();
    walker.check("", &request);
    walker.clean_since(mark).then_some(request)
}
