use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use super::LLMClient;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::response::parse_json_object;

/// One structured-generation call: the model must answer with a JSON object
/// following `schema_outline`.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub schema_name: String,
    pub schema_outline: String,
    pub system: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct StructuredResponse {
    pub value: Value,
    pub model: String,
}

/// "Given a schema and a prompt, return a structured object or fail."
#[async_trait]
pub trait StructuredGenerator {
    async fn generate_object(&self, request: &StructuredRequest) -> Result<StructuredResponse>;
}

/// Production generator: a plain chat call with the schema outline appended to the
/// system prompt, followed by JSON extraction from the answer.
pub struct LlmStructuredGenerator {
    client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl LlmStructuredGenerator {
    pub fn new(client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { client, config }
    }

    fn system_prompt(request: &StructuredRequest) -> String {
        let mut system = request.system.trim().to_string();
        system.push_str("\n\nRespond with a single JSON object named ");
        system.push_str(&request.schema_name);
        system.push_str(". Do not wrap it in prose. Fields:\n");
        system.push_str(&request.schema_outline);
        system
    }
}

#[async_trait]
impl StructuredGenerator for LlmStructuredGenerator {
    async fn generate_object(&self, request: &StructuredRequest) -> Result<StructuredResponse> {
        let system = Self::system_prompt(request);
        debug!(
            schema = %request.schema_name,
            model = %self.config.model,
            prompt_chars = request.prompt.len(),
            "Requesting structured output"
        );

        let raw = self
            .client
            .generate(&self.config, &system, &request.prompt)
            .await
            .map_err(|e| {
                error!(schema = %request.schema_name, error = %e, "Provider call failed");
                e
            })?;

        let value = parse_json_object(&raw)?;
        Ok(StructuredResponse {
            value,
            model: self.config.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use std::sync::Mutex;

    struct CannedClient {
        answer: String,
        seen_system: Mutex<Option<String>>,
    }

    #[async_trait]
    impl LLMClient for CannedClient {
        async fn generate(&self, _config: &LLMConfig, system: &str, _user: &str) -> Result<String> {
            *self.seen_system.lock().unwrap() = Some(system.to_string());
            Ok(self.answer.clone())
        }
    }

    fn request() -> StructuredRequest {
        StructuredRequest {
            schema_name: "QaCanvasDocument".to_string(),
            schema_outline: "- ticketSummary (object): digest\n".to_string(),
            system: "You are a QA analyst.".to_string(),
            prompt: "Ticket MOB-42".to_string(),
        }
    }

    #[tokio::test]
    async fn test_parses_fenced_answer_and_reports_model() {
        let client = Arc::new(CannedClient {
            answer: "```json\n{\"ticketSummary\": {}}\n```".to_string(),
            seen_system: Mutex::new(None),
        });
        let generator = LlmStructuredGenerator::new(client.clone(), LLMConfig::default());

        let response = generator.generate_object(&request()).await.unwrap();
        assert!(response.value["ticketSummary"].is_object());
        assert_eq!(response.model, "local-model");

        let system = client.seen_system.lock().unwrap().clone().unwrap();
        assert!(system.starts_with("You are a QA analyst."));
        assert!(system.contains("QaCanvasDocument"));
        assert!(system.contains("- ticketSummary (object): digest"));
    }

    #[tokio::test]
    async fn test_prose_answer_is_a_parse_error() {
        let client = Arc::new(CannedClient {
            answer: "I cannot help with that.".to_string(),
            seen_system: Mutex::new(None),
        });
        let generator = LlmStructuredGenerator::new(client, LLMConfig::default());
        let result = generator.generate_object(&request()).await;
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }
}
