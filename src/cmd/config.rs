use crate::config::{ActionInputs, AppConfig};
use crate::error::AppResult;

/// Prints the resolved configuration with secrets masked.
pub fn run(inputs: &ActionInputs) -> AppResult<()> {
    let config = AppConfig::from_inputs(inputs)?;
    for (label, value) in describe(&config, inputs) {
        println!("{label}: {value}");
    }
    Ok(())
}

fn describe(config: &AppConfig, inputs: &ActionInputs) -> Vec<(&'static str, String)> {
    vec![
        ("LLM provider", config.llm.provider.as_str().to_string()),
        ("Model endpoint", config.llm.endpoint.clone()),
        ("Model name", config.llm.model.clone()),
        ("API version", config.llm.api_version.clone()),
        ("API key", config.llm.api_key.masked()),
        ("GitHub API", config.github_api_url.clone()),
        ("GitHub token", config.github_token.masked()),
        ("Repository", display_value(inputs.get("github_repository"))),
        ("PR number", display_value(inputs.get("pr_number"))),
        ("Review depth", config.review_depth.to_string()),
        ("Max tokens", config.max_tokens.to_string()),
        ("Temperature", config.temperature.to_string()),
        ("Token budget", config.summary.budget_tokens.to_string()),
        ("Max patch chars", config.summary.max_patch_chars.to_string()),
        ("Chars per token", config.summary.chars_per_token.to_string()),
        (
            "Request timeout",
            format!("{}s", config.llm.request_timeout_secs),
        ),
    ]
}

fn display_value(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}
