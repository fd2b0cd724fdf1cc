use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Chat-completions client for OpenAI, OpenRouter and local OpenAI-compatible servers.
pub struct OpenAIClient {
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Local servers usually run without a key; hosted providers need one.
    fn api_key(config: &LLMConfig) -> Result<Option<String>> {
        match (&config.provider, &config.api_key) {
            (_, Some(key)) if !key.trim().is_empty() => Ok(Some(key.clone())),
            (LLMProvider::Local, _) => Ok(None),
            (provider, _) => Err(AppError::LLMError(format!(
                "Missing API key for {:?}",
                provider
            ))),
        }
    }

    fn endpoint(base_url: &str, path: &str) -> String {
        if base_url.ends_with('/') {
            format!("{}{}", base_url, path)
        } else {
            format!("{}/{}", base_url, path)
        }
    }

    fn request_body(config: &LLMConfig, system: &str, user: &str) -> Value {
        json!({
            "model": config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system
                },
                {
                    "role": "user",
                    "content": user
                }
            ],
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        })
    }

    fn message_content(json: &Value) -> Result<String> {
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))
    }
}

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        let url = Self::endpoint(&config.base_url, "chat/completions");
        let body = Self::request_body(config, system, user);

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = Self::api_key(config)? {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        Self::message_content(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        assert_eq!(
            OpenAIClient::endpoint("http://localhost:1234/v1", "chat/completions"),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(
            OpenAIClient::endpoint("https://openrouter.ai/api/v1/", "chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_api_key_rules() {
        let local = LLMConfig::default();
        assert_eq!(OpenAIClient::api_key(&local).unwrap(), None);

        let hosted = LLMConfig {
            provider: LLMProvider::OpenRouter,
            api_key: Some("  ".to_string()),
            ..LLMConfig::default()
        };
        assert!(matches!(OpenAIClient::api_key(&hosted), Err(AppError::LLMError(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = OpenAIClient::request_body(&LLMConfig::default(), "sys", "usr");
        assert_eq!(body["model"], "local-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn test_message_content() {
        let json = serde_json::json!({"choices": [{"message": {"content": "{}"}}]});
        assert_eq!(OpenAIClient::message_content(&json).unwrap(), "{}");
        assert!(OpenAIClient::message_content(&serde_json::json!({})).is_err());
    }
}
