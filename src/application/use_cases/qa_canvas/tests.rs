use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use super::QaCanvasUseCase;
use crate::application::use_cases::document_schema::tests::{
    sample_document_value, sample_profile_value, sample_ticket_value,
};
use crate::application::use_cases::document_schema::validate_qa_canvas_document;
use crate::domain::analysis::AnalysisRequest;
use crate::domain::error::{AppError, Result};
use crate::domain::qa_document::{Severity, WarningType};
use crate::domain::qa_suggestion::{SuggestionRequest, SuggestionType};
use crate::infrastructure::config::GenerationSettings;
use crate::infrastructure::llm_clients::{StructuredGenerator, StructuredRequest, StructuredResponse};

/// Replays a fixed answer and records every request it receives.
struct StubGenerator {
    answer: std::result::Result<Value, String>,
    requests: Mutex<Vec<StructuredRequest>>,
}

impl StubGenerator {
    fn answering(value: Value) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(value),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> StructuredRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl StructuredGenerator for StubGenerator {
    async fn generate_object(&self, request: &StructuredRequest) -> Result<StructuredResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.answer {
            Ok(value) => Ok(StructuredResponse {
                value: value.clone(),
                model: "stub-model".to_string(),
            }),
            Err(message) => Err(AppError::LLMError(message.clone())),
        }
    }
}

fn use_case(generator: Arc<StubGenerator>, settings: GenerationSettings) -> QaCanvasUseCase {
    QaCanvasUseCase::new(generator, settings)
}

fn analysis_request() -> AnalysisRequest {
    serde_json::from_value(json!({
        "qaProfile": sample_profile_value(),
        "ticketJson": sample_ticket_value(),
        "regenerationReason": "ticket updated"
    }))
    .unwrap()
}

fn model_document() -> Value {
    let mut value = sample_document_value();
    value["metadata"] = json!({});
    value
}

#[tokio::test]
async fn test_generates_document_with_server_metadata() {
    let generator = StubGenerator::answering(model_document());
    let qa = use_case(generator.clone(), GenerationSettings::default());

    let document = qa.generate_document(analysis_request()).await.unwrap();

    assert_eq!(document.metadata.ticket_id, "MOB-42");
    assert_eq!(document.metadata.ai_model.as_deref(), Some("stub-model"));
    assert_eq!(document.metadata.document_version, "1.0");
    assert_eq!(document.metadata.regeneration_reason.as_deref(), Some("ticket updated"));
    assert!(document.metadata.generation_time.is_some());
    assert!(document.metadata.word_count.unwrap_or_default() > 0);
    assert_eq!(document.test_cases.len(), 1);

    let request = generator.last_request();
    assert_eq!(request.schema_name, "QaCanvasDocument");
    assert!(request.prompt.contains("Ticket: MOB-42"));
    assert!(request.schema_outline.contains("testCases[].testCase.scenario"));
    assert!(!request.schema_outline.contains("expectedOutcome"));

    let round_trip = serde_json::to_value(&document).unwrap();
    assert!(validate_qa_canvas_document(&round_trip).is_ok());
}

#[tokio::test]
async fn test_analyzer_warnings_lead_and_are_not_duplicated() {
    let generator = StubGenerator::answering(model_document());
    let qa = use_case(generator, GenerationSettings::default());

    let document = qa.generate_document(analysis_request()).await.unwrap();

    let titles: Vec<&str> = document
        .configuration_warnings
        .iter()
        .map(|w| w.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Security Testing Disabled", "Mobile Testing Disabled"]);
    assert_eq!(document.configuration_warnings[0].warning_type, WarningType::CategoryMismatch);
    assert_eq!(document.configuration_warnings[0].severity, Severity::High);
    assert_eq!(document.configuration_warnings[1].severity, Severity::Medium);
}

#[tokio::test]
async fn test_invalid_output_falls_back_to_minimal_document() {
    let mut bad = model_document();
    bad["testCases"][0]["format"] = json!("steps");
    let qa = use_case(StubGenerator::answering(bad), GenerationSettings::default());

    let document = qa.generate_document(analysis_request()).await.unwrap();

    assert!(document.test_cases.is_empty());
    assert!(document.acceptance_criteria.is_empty());
    assert!(document.ticket_summary.problem.contains("Login button not working"));
    assert_eq!(document.configuration_warnings.len(), 2);
    assert_eq!(document.metadata.ai_model.as_deref(), Some("stub-model"));

    let round_trip = serde_json::to_value(&document).unwrap();
    assert!(validate_qa_canvas_document(&round_trip).is_ok());
}

#[tokio::test]
async fn test_invalid_output_without_fallback_is_an_error() {
    let mut bad = model_document();
    bad.as_object_mut().unwrap().remove("acceptanceCriteria");
    let settings = GenerationSettings {
        fallback_to_minimal: false,
        ..GenerationSettings::default()
    };
    let qa = use_case(StubGenerator::answering(bad), settings);

    match qa.generate_document(analysis_request()).await {
        Err(AppError::InvalidDocument(errors)) => {
            assert_eq!(errors[0].path, "acceptanceCriteria");
        }
        other => panic!("expected InvalidDocument, got {:?}", other.map(|d| d.metadata.ticket_id)),
    }
}

#[tokio::test]
async fn test_provider_errors_propagate() {
    let qa = use_case(StubGenerator::failing("API error (503)"), GenerationSettings::default());
    let result = qa.generate_document(analysis_request()).await;
    assert!(matches!(result, Err(AppError::LLMError(message)) if message.contains("503")));
}

#[tokio::test]
async fn test_profile_without_categories_is_rejected_before_generation() {
    let generator = StubGenerator::answering(model_document());
    let qa = use_case(generator.clone(), GenerationSettings::default());
    let mut request = analysis_request();
    request.qa_profile.qa_categories = crate::domain::qa_profile::QaCategories::all(false);

    let result = qa.generate_document(request).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(generator.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_skips_the_model() {
    let generator = StubGenerator::answering(json!({}));
    let qa = use_case(generator.clone(), GenerationSettings::default());

    let insights = qa.preview(&analysis_request());
    assert!(insights.ticket_summary.solution.contains("CSS issue"));
    assert_eq!(insights.categories.len(), 4);
    assert!(generator.requests.lock().unwrap().is_empty());
}

fn suggestion_request(max: u32, exclude: &[&str]) -> SuggestionRequest {
    serde_json::from_value(json!({
        "currentDocument": sample_document_value(),
        "maxSuggestions": max,
        "excludeTypes": exclude
    }))
    .unwrap()
}

fn suggestion(kind: &str, title: &str) -> Value {
    json!({
        "suggestionType": kind,
        "title": title,
        "description": "Add a test",
        "reasoning": "Not covered yet",
        "id": "model-id"
    })
}

#[tokio::test]
async fn test_suggestions_are_filtered_and_truncated() {
    let answer = json!({
        "suggestions": [
            suggestion("performance_test", "Measure tap latency"),
            {"suggestionType": "made_up", "title": "Broken"},
            suggestion("edge_case", "Double tap the button"),
            suggestion("negative_test", "Login with expired session"),
            suggestion("ui_verification", "Check focus ring")
        ]
    });
    let generator = StubGenerator::answering(answer);
    let qa = use_case(generator.clone(), GenerationSettings::default());
    let request = suggestion_request(2, &["performance_test"]);
    let before = request.current_document.clone();

    let response = qa.generate_suggestions(request.clone()).await.unwrap();

    assert_eq!(response.total_count, 2);
    let kinds: Vec<SuggestionType> = response.suggestions.iter().map(|s| s.suggestion_type).collect();
    assert_eq!(kinds, vec![SuggestionType::EdgeCase, SuggestionType::NegativeTest]);
    assert!(response.suggestions.iter().all(|s| s.id.starts_with("sugg-")));
    assert_ne!(response.suggestions[0].id, response.suggestions[1].id);
    assert!(response.context_summary.starts_with("MOB-42:"));
    assert_eq!(request.current_document, before);
    assert_eq!(generator.last_request().schema_name, "QaSuggestionList");
}

#[tokio::test]
async fn test_suggestions_need_a_suggestions_array() {
    let qa = use_case(StubGenerator::answering(json!({"items": []})), GenerationSettings::default());
    let result = qa.generate_suggestions(suggestion_request(3, &[])).await;
    assert!(matches!(result, Err(AppError::ParseError(_))));
}

#[tokio::test]
async fn test_out_of_range_max_is_rejected() {
    let generator = StubGenerator::answering(json!({"suggestions": []}));
    let qa = use_case(generator.clone(), GenerationSettings::default());
    let result = qa.generate_suggestions(suggestion_request(0, &[])).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(generator.requests.lock().unwrap().is_empty());
}
