use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::coverage::summarize_coverage;
use super::prompts::{build_suggestion_system_prompt, build_suggestion_user_prompt};
use super::{QaCanvasUseCase, SUGGESTION_SCHEMA_NAME};
use crate::application::use_cases::document_schema::{render_schema_outline, SUGGESTION_FIELDS};
use crate::domain::error::{AppError, Result};
use crate::domain::qa_suggestion::{QaSuggestion, SuggestionRequest, SuggestionResponse};
use crate::infrastructure::llm_clients::StructuredRequest;

impl QaCanvasUseCase {
    /// Proposals for improving `request.current_document`, which is only read.
    pub async fn generate_suggestions(&self, request: SuggestionRequest) -> Result<SuggestionResponse> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let coverage = summarize_coverage(&request.current_document);
        info!(
            ticket_id = %coverage.ticket_id,
            max_suggestions = request.max_suggestions,
            uncovered = coverage.uncovered_categories.len(),
            "Generating QA suggestions"
        );

        let structured = StructuredRequest {
            schema_name: SUGGESTION_SCHEMA_NAME.to_string(),
            schema_outline: render_schema_outline(SUGGESTION_FIELDS, None),
            system: build_suggestion_system_prompt(),
            prompt: build_suggestion_user_prompt(&request, &coverage),
        };
        let response = self.generator.generate_object(&structured).await?;

        let items = response
            .value
            .get("suggestions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AppError::ParseError("Model output has no `suggestions` array".to_string())
            })?;

        let limit = request.max_suggestions as usize;
        let mut suggestions = Vec::new();
        let mut dropped = 0usize;
        for (index, item) in items.iter().enumerate() {
            if suggestions.len() == limit {
                break;
            }

            let mut suggestion = match serde_json::from_value::<QaSuggestion>(item.clone()) {
                Ok(suggestion) => suggestion,
                Err(err) => {
                    warn!(index, error = %err, "Dropping undecodable suggestion");
                    dropped += 1;
                    continue;
                }
            };
            if suggestion.title.trim().is_empty() {
                warn!(index, "Dropping suggestion without a title");
                dropped += 1;
                continue;
            }
            if request.exclude_types.contains(&suggestion.suggestion_type) {
                debug!(index, suggestion_type = suggestion.suggestion_type.as_str(), "Skipping excluded suggestion type");
                dropped += 1;
                continue;
            }

            suggestion.id = format!("sugg-{}", Uuid::new_v4());
            suggestions.push(suggestion);
        }

        info!(
            ticket_id = %coverage.ticket_id,
            returned = suggestions.len(),
            dropped,
            "QA suggestions ready"
        );

        Ok(SuggestionResponse {
            total_count: suggestions.len(),
            suggestions,
            generated_at: Utc::now(),
            context_summary: coverage.describe(),
        })
    }
}
