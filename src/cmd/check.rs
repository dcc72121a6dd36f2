use tracing::info;

use crate::config::{ActionInputs, LlmSettings};
use crate::domain::prompt::PromptPair;
use crate::domain::review::ReviewDepth;
use crate::error::{AppError, AppResult};
use crate::infra::llm::ChatCompletionClient;
use crate::services::{CompletionRequest, LanguageModelService};

const CHECK_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const CHECK_MESSAGE: &str = "Hello, this is a connectivity test. Reply with a short greeting.";
const CHECK_MAX_TOKENS: u32 = 50;
const CHECK_TEMPERATURE: f32 = 0.1;

/// Sends one short message to the configured model and returns its reply.
pub async fn run(inputs: &ActionInputs) -> AppResult<String> {
    let settings = LlmSettings::from_inputs(inputs)?;
    println!("Endpoint: {}", settings.endpoint);
    println!("Model: {}", settings.model);
    println!("API version: {}", settings.api_version);
    println!("API key: {}", settings.api_key.masked());

    let client = ChatCompletionClient::new(&settings)?;
    reply(&client).await
}

async fn reply(model: &dyn LanguageModelService) -> AppResult<String> {
    let request = CompletionRequest {
        prompts: PromptPair {
            system: CHECK_SYSTEM_PROMPT.to_string(),
            task: CHECK_MESSAGE.to_string(),
        },
        depth: ReviewDepth::Basic,
        temperature: CHECK_TEMPERATURE,
        max_tokens: CHECK_MAX_TOKENS,
    };

    let completion = model.complete(&request).await?;
    let content = completion.content.trim();
    if content.is_empty() {
        return Err(AppError::LanguageModel(
            "model returned an empty reply to the connectivity check".to_string(),
        ));
    }

    info!("connectivity check succeeded");
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::services::Completion;

    struct EchoModel {
        reply: String,
        seen: Mutex<Option<CompletionRequest>>,
    }

    #[async_trait]
    impl LanguageModelService for EchoModel {
        async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(Completion {
                content: self.reply.clone(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn sends_short_low_temperature_message() {
        let model = EchoModel {
            reply: "  Hello there!\n".to_string(),
            seen: Mutex::new(None),
        };

        let reply = reply(&model).await.unwrap();

        assert_eq!(reply, "Hello there!");
        let seen = model.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.max_tokens, 50);
        assert!((seen.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn rejects_blank_reply() {
        let model = EchoModel {
            reply: "   ".to_string(),
            seen: Mutex::new(None),
        };

        assert!(matches!(
            reply(&model).await,
            Err(AppError::LanguageModel(_))
        ));
    }

    #[tokio::test]
    async fn requires_model_settings() {
        let inputs = ActionInputs::from_vars([("AZURE_OPENAI_ENDPOINT", "https://x")]);

        let err = run(&inputs).await.unwrap_err();

        assert!(err.to_string().starts_with("Missing required Azure OpenAI configuration"));
    }
}
