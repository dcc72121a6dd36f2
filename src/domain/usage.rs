#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Appends a collapsed token-usage block to a model response. Responses
/// without usage accounting are returned unchanged.
pub fn annotate_usage(content: &str, label: &str, usage: Option<&TokenUsage>) -> String {
    let Some(usage) = usage else {
        return content.to_string();
    };

    format!(
        "{content}\n\n---\n\n<details>\n<summary>📊 Token Usage - {label}</summary>\n\n\
         - Prompt tokens: {prompt}\n\
         - Completion tokens: {completion}\n\
         - Total tokens: {total}\n\n\
         </details>",
        prompt = usage.prompt_tokens,
        completion = usage.completion_tokens,
        total = usage.total_tokens,
    )
}
