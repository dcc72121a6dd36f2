use async_trait::async_trait;

use crate::domain::prompt::PromptPair;
use crate::domain::review::ReviewDepth;
use crate::domain::usage::TokenUsage;
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompts: PromptPair,
    pub depth: ReviewDepth,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion>;
}
