use chrono::Utc;
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

use super::hashing::hash_input;
use super::prompts::{build_document_system_prompt, build_document_user_prompt};
use super::{QaCanvasUseCase, DOCUMENT_SCHEMA_NAME};
use crate::application::use_cases::document_schema::{
    create_minimal_document, render_schema_outline, validate_qa_canvas_document, DOCUMENT_FIELDS,
};
use crate::application::use_cases::ticket_analysis::{analyze, ConfigurationConflict};
use crate::domain::analysis::AnalysisRequest;
use crate::domain::error::{AppError, Result};
use crate::domain::qa_document::{
    ConfigurationWarning, DocumentMetadata, QaCanvasDocument, DOCUMENT_VERSION,
};
use crate::infrastructure::llm_clients::StructuredRequest;
use crate::shared::text::count_words_in_value;

impl QaCanvasUseCase {
    pub async fn generate_document(&self, request: AnalysisRequest) -> Result<QaCanvasDocument> {
        let started = Instant::now();
        let ticket = &request.ticket_json;
        let profile = &request.qa_profile;

        let insights = analyze(ticket, profile);
        if insights.categories.is_empty() {
            return Err(AppError::ValidationError(
                "At least one QA category must be enabled.".to_string(),
            ));
        }

        let input_hash = hash_input(ticket, profile);
        info!(
            ticket_id = %ticket.issue_key,
            format = %profile.test_case_format,
            categories = insights.categories.len(),
            complexity = %insights.complexity,
            conflicts = insights.configuration_warnings.len(),
            input_hash = %input_hash,
            "Generating QA document"
        );

        let structured = StructuredRequest {
            schema_name: DOCUMENT_SCHEMA_NAME.to_string(),
            schema_outline: render_schema_outline(DOCUMENT_FIELDS, Some(profile.test_case_format)),
            system: build_document_system_prompt(profile.test_case_format),
            prompt: build_document_user_prompt(
                ticket,
                profile,
                &insights,
                &self.settings,
                request.regeneration_reason.as_deref(),
            ),
        };
        let response = self.generator.generate_object(&structured).await?;

        let metadata = DocumentMetadata {
            generated_at: Utc::now(),
            qa_profile: profile.clone(),
            ticket_id: ticket.issue_key.clone(),
            document_version: DOCUMENT_VERSION.to_string(),
            ai_model: Some(response.model.clone()),
            generation_time: None,
            word_count: None,
            regeneration_reason: request.regeneration_reason.clone(),
        };
        let mut candidate = response.value;
        if let Value::Object(map) = &mut candidate {
            map.insert("metadata".to_string(), serde_json::to_value(&metadata)?);
        }

        let mut document = match validate_qa_canvas_document(&candidate) {
            Ok(mut document) => {
                document.configuration_warnings =
                    merge_warnings(&insights.configuration_warnings, document.configuration_warnings);
                document
            }
            Err(errors) => {
                warn!(
                    ticket_id = %ticket.issue_key,
                    input_hash = %input_hash,
                    error_count = errors.len(),
                    first_error = %errors.first().map(|e| e.to_string()).unwrap_or_default(),
                    "Model output failed document validation"
                );
                if !self.settings.fallback_to_minimal {
                    return Err(AppError::InvalidDocument(errors));
                }

                let mut fallback = create_minimal_document(&ticket.issue_key, profile);
                fallback.ticket_summary = insights.ticket_summary.clone();
                fallback.configuration_warnings =
                    merge_warnings(&insights.configuration_warnings, Vec::new());
                fallback.metadata = metadata;
                fallback
            }
        };

        document.metadata.word_count = Some(word_count(&document)?);
        document.metadata.generation_time = Some(started.elapsed().as_millis() as u64);

        info!(
            ticket_id = %ticket.issue_key,
            input_hash = %input_hash,
            acceptance_criteria = document.acceptance_criteria.len(),
            test_cases = document.test_cases.len(),
            duration_ms = document.metadata.generation_time.unwrap_or_default(),
            "QA document ready"
        );
        Ok(document)
    }
}

/// Analyzer conflicts first, then model warnings whose title the analyzer did not already use.
fn merge_warnings(
    conflicts: &[ConfigurationConflict],
    from_model: Vec<ConfigurationWarning>,
) -> Vec<ConfigurationWarning> {
    let mut merged: Vec<ConfigurationWarning> = conflicts
        .iter()
        .cloned()
        .map(ConfigurationWarning::from)
        .collect();

    for warning in from_model {
        let duplicate = merged
            .iter()
            .any(|existing| existing.title.trim().eq_ignore_ascii_case(warning.title.trim()));
        if !duplicate {
            merged.push(warning);
        }
    }
    merged
}

/// Words of generated content; metadata is not counted.
fn word_count(document: &QaCanvasDocument) -> Result<u64> {
    let mut value = serde_json::to_value(document)?;
    if let Value::Object(map) = &mut value {
        map.remove("metadata");
    }
    Ok(count_words_in_value(&value) as u64)
}
