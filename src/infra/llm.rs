use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{LlmProvider, LlmSettings, Secret};
use crate::domain::usage::TokenUsage;
use crate::error::{AppError, AppResult};
use crate::services::{Completion, CompletionRequest, LanguageModelService};

/// Chat-completions client for Azure OpenAI deployments and
/// OpenAI-compatible endpoints.
pub struct ChatCompletionClient {
    http: Client,
    provider: LlmProvider,
    url: String,
    api_key: Secret,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(settings: &LlmSettings) -> AppResult<Self> {
        let endpoint = settings.endpoint.trim().trim_end_matches('/');
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AppError::Configuration(format!(
                "model endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            provider: settings.provider,
            url: chat_url(settings.provider, endpoint, &settings.model, &settings.api_version),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }
}

fn chat_url(provider: LlmProvider, endpoint: &str, model: &str, api_version: &str) -> String {
    match provider {
        LlmProvider::Azure => format!(
            "{endpoint}/openai/deployments/{model}/chat/completions?api-version={api_version}"
        ),
        LlmProvider::OpenAi if endpoint.ends_with("/v1") => format!("{endpoint}/chat/completions"),
        LlmProvider::OpenAi => format!("{endpoint}/v1/chat/completions"),
    }
}

#[async_trait]
impl LanguageModelService for ChatCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        let body = ChatRequest {
            model: match self.provider {
                LlmProvider::Azure => None,
                LlmProvider::OpenAi => Some(self.model.as_str()),
            },
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.prompts.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompts.task,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            provider = self.provider.as_str(),
            model = %self.model,
            depth = %request.depth,
            prompt_chars = request.prompts.task.len(),
            "POST chat completion"
        );

        let builder = self.http.post(&self.url).json(&body);
        let builder = match self.provider {
            LlmProvider::Azure => builder.header("api-key", self.api_key.expose()),
            LlmProvider::OpenAi => {
                builder.header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose()))
            }
        };

        let response = builder.send().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to call chat completion endpoint: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "chat completion endpoint responded with {status}: {body}"
            )));
        }

        let payload: ChatResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse chat completion response: {err}"))
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                AppError::LanguageModel("no choices returned from the model".to_string())
            })?;

        let usage = payload.usage.map(TokenUsage::from);
        if let Some(usage) = &usage {
            info!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                total = usage.total_tokens,
                "token usage"
            );
        }

        Ok(Completion { content, usage })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<ChatUsage> for TokenUsage {
    fn from(usage: ChatUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::domain::prompt::PromptPair;
    use crate::domain::review::ReviewDepth;

    fn settings(server: &Server, provider: LlmProvider) -> LlmSettings {
        LlmSettings {
            provider,
            endpoint: format!("{}/", server.url()),
            api_key: Secret::new("test-key"),
            model: "gpt-4".to_string(),
            api_version: "2024-02-01".to_string(),
            request_timeout_secs: 5,
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            prompts: PromptPair {
                system: "system prompt".to_string(),
                task: "task prompt".to_string(),
            },
            depth: ReviewDepth::Comprehensive,
            temperature: 0.3,
            max_tokens: 2000,
        }
    }

    #[tokio::test]
    async fn calls_azure_deployment() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/deployments/gpt-4/chat/completions")
            .match_query(Matcher::UrlEncoded("api-version".into(), "2024-02-01".into()))
            .match_header("api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "messages": [
                    {"role": "system", "content": "system prompt"},
                    {"role": "user", "content": "task prompt"}
                ],
                "max_tokens": 2000
            })))
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "Mock overview"}}],
                    "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ChatCompletionClient::new(&settings(&server, LlmProvider::Azure)).unwrap();
        let completion = client.complete(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "Mock overview");
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(150));
    }

    #[tokio::test]
    async fn calls_openai_compatible_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({"model": "gpt-4"})))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": "hi"}}]}).to_string())
            .create_async()
            .await;

        let client = ChatCompletionClient::new(&settings(&server, LlmProvider::OpenAi)).unwrap();
        let completion = client.complete(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(completion.content, "hi");
        assert!(completion.usage.is_none());
    }

    #[tokio::test]
    async fn reports_http_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/openai/deployments/gpt-4/chat/completions")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("Access denied")
            .create_async()
            .await;

        let client = ChatCompletionClient::new(&settings(&server, LlmProvider::Azure)).unwrap();
        let err = client.complete(&request()).await.unwrap_err();

        assert!(matches!(err, AppError::LanguageModel(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn rejects_empty_choices() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/openai/deployments/gpt-4/chat/completions")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let client = ChatCompletionClient::new(&settings(&server, LlmProvider::Azure)).unwrap();
        let err = client.complete(&request()).await.unwrap_err();

        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn builds_provider_urls() {
        assert_eq!(
            chat_url(LlmProvider::Azure, "https://x.openai.azure.com", "gpt-4", "v1"),
            "https://x.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=v1"
        );
        assert_eq!(
            chat_url(LlmProvider::OpenAi, "https://api.openai.com/v1", "m", "v"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_url(LlmProvider::OpenAi, "http://localhost:8080", "m", "v"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let settings = LlmSettings {
            provider: LlmProvider::Azure,
            endpoint: "ftp://nope".to_string(),
            api_key: Secret::new("k"),
            model: "m".to_string(),
            api_version: "v".to_string(),
            request_timeout_secs: 5,
        };

        assert!(matches!(
            ChatCompletionClient::new(&settings),
            Err(AppError::Configuration(_))
        ));
    }
}
