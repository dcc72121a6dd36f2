use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::change::{DEFAULT_CHARS_PER_TOKEN, SummaryOptions};
use crate::domain::review::ReviewDepth;
use crate::error::{AppError, AppResult};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TOKEN_BUDGET: usize = 12_000;
const DEFAULT_MAX_PATCH_CHARS: usize = 4000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

const MISSING_LLM_CONFIG: &str = "Missing required Azure OpenAI configuration. Please check your \
     azure_openai_endpoint, azure_openai_api_key, and azure_openai_model_name inputs.";

/// Action inputs keyed by lower-case input name.
///
/// `INPUT_<NAME>` variables set by the Actions runner win over a bare
/// `<NAME>` variable, so local runs can use a `.env` file with the same names.
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    values: HashMap<String, String>,
}

impl ActionInputs {
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut plain = HashMap::new();
        let mut prefixed = HashMap::new();

        for (key, value) in vars {
            let value = value.into();
            if value.trim().is_empty() {
                continue;
            }
            let key = key.as_ref();
            match key.strip_prefix("INPUT_") {
                Some(name) => prefixed.insert(name.to_lowercase(), value),
                None => plain.insert(key.to_lowercase(), value),
            };
        }

        plain.extend(prefixed);
        Self { values: plain }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&name.to_lowercase())
            .map(|value| value.trim())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_lowercase(), value.into());
    }

    fn required(&self, name: &str) -> AppResult<String> {
        self.get(name).map(str::to_string).ok_or_else(|| {
            AppError::Configuration(format!("Input required and not supplied: {name}"))
        })
    }

    fn parsed<T>(&self, name: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|err| {
                AppError::Configuration(format!("invalid value '{raw}' for input {name}: {err}"))
            }),
        }
    }

    fn positive(&self, name: &str, default: usize) -> AppResult<usize> {
        let value = self.parsed(name, default)?;
        if value == 0 {
            return Err(AppError::Configuration(format!(
                "input {name} must be greater than zero"
            )));
        }
        Ok(value)
    }
}

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 6 {
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Azure,
    OpenAi,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Azure => "azure",
            LlmProvider::OpenAi => "openai",
        }
    }

    fn from_input(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "azure" | "azure_openai" => Ok(LlmProvider::Azure),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(AppError::Configuration(format!(
                "unsupported llm_provider '{other}' (expected azure or openai)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub endpoint: String,
    pub api_key: Secret,
    pub model: String,
    pub api_version: String,
    pub request_timeout_secs: u64,
}

impl LlmSettings {
    pub fn from_inputs(inputs: &ActionInputs) -> AppResult<Self> {
        let endpoint = inputs.get("azure_openai_endpoint");
        let api_key = inputs.get("azure_openai_api_key");
        let model = inputs.get("azure_openai_model_name");

        let (Some(endpoint), Some(api_key), Some(model)) = (endpoint, api_key, model) else {
            return Err(AppError::Configuration(MISSING_LLM_CONFIG.to_string()));
        };

        let provider = match inputs.get("llm_provider") {
            Some(raw) => LlmProvider::from_input(raw)?,
            None => LlmProvider::Azure,
        };

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            api_key: Secret::new(api_key),
            model: model.to_string(),
            api_version: inputs
                .get("azure_openai_api_version")
                .unwrap_or(DEFAULT_AZURE_API_VERSION)
                .to_string(),
            request_timeout_secs: inputs
                .parsed("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub github_token: Secret,
    pub github_api_url: String,
    pub review_depth: ReviewDepth,
    pub max_tokens: u32,
    pub temperature: f32,
    pub summary: SummaryOptions,
}

impl AppConfig {
    pub fn from_inputs(inputs: &ActionInputs) -> AppResult<Self> {
        let llm = LlmSettings::from_inputs(inputs)?;
        let github_token = Secret::new(inputs.required("github_token")?);

        let summary = SummaryOptions::new(
            inputs.positive("token_budget", DEFAULT_TOKEN_BUDGET)?,
            inputs.positive("max_patch_chars", DEFAULT_MAX_PATCH_CHARS)?,
        )
        .with_chars_per_token(inputs.positive("chars_per_token", DEFAULT_CHARS_PER_TOKEN)?);

        Ok(Self {
            llm,
            github_token,
            github_api_url: inputs
                .get("github_api_url")
                .unwrap_or(DEFAULT_GITHUB_API_URL)
                .to_string(),
            review_depth: inputs
                .get("review_depth")
                .map(ReviewDepth::from_input)
                .unwrap_or_default(),
            max_tokens: inputs.parsed("max_tokens", DEFAULT_MAX_TOKENS)?,
            temperature: inputs.parsed("temperature", DEFAULT_TEMPERATURE)?,
            summary,
        })
    }
}
