mod coverage;
mod generate;
mod hashing;
mod prompts;
mod suggestions;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::application::use_cases::ticket_analysis::{analyze, TicketInsights};
use crate::domain::analysis::AnalysisRequest;
use crate::infrastructure::config::GenerationSettings;
use crate::infrastructure::llm_clients::StructuredGenerator;

pub use coverage::{summarize_coverage, CoverageSummary};

const PROMPT_VERSION: &str = "v1";

const DOCUMENT_SCHEMA_NAME: &str = "QaCanvasDocument";
const SUGGESTION_SCHEMA_NAME: &str = "QaSuggestionList";

/// Turns tickets into QA documents and documents into suggestions.
pub struct QaCanvasUseCase {
    generator: Arc<dyn StructuredGenerator + Send + Sync>,
    settings: GenerationSettings,
}

impl QaCanvasUseCase {
    pub fn new(
        generator: Arc<dyn StructuredGenerator + Send + Sync>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            generator,
            settings,
        }
    }

    /// Analyzer output only; no model call.
    pub fn preview(&self, request: &AnalysisRequest) -> TicketInsights {
        analyze(&request.ticket_json, &request.qa_profile)
    }
}
