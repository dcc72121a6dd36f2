//! GitHub Actions runtime boundary: event payload, repository coordinates,
//! step outputs and failure annotations.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::config::ActionInputs;
use crate::domain::pull_request::PullRequestRef;
use crate::error::{AppError, AppResult};
use crate::services::OutputSink;

const MISSING_PR_CONTEXT: &str = "Missing required PR information. Ensure this action runs on \
     pull_request events or provide pr_number input.";

/// Resolves the pull request under review.
///
/// The number comes from `pr_override`, then the event payload at
/// `GITHUB_EVENT_PATH`, then the `pr_number` input.
pub fn resolve_pull_request(
    inputs: &ActionInputs,
    pr_override: Option<u64>,
) -> AppResult<PullRequestRef> {
    let number = match pr_override {
        Some(number) => Some(number),
        None => match inputs.get("github_event_path") {
            Some(path) => event_pr_number(Path::new(path))?,
            None => None,
        },
    };
    let number = match number {
        Some(number) => Some(number),
        None => inputs
            .get("pr_number")
            .map(|raw| {
                raw.parse::<u64>().map_err(|err| {
                    AppError::Configuration(format!("invalid value '{raw}' for input pr_number: {err}"))
                })
            })
            .transpose()?,
    };

    let repository = inputs.get("github_repository");
    let repo = repository.and_then(|full| full.split('/').nth(1)).filter(|r| !r.is_empty());
    let owner = inputs
        .get("github_repository_owner")
        .or_else(|| repository.and_then(|full| full.split('/').next()))
        .filter(|o| !o.is_empty());

    match (owner, repo, number) {
        (Some(owner), Some(repo), Some(number)) if number > 0 => {
            Ok(PullRequestRef::new(owner, repo, number))
        }
        _ => Err(AppError::Context(MISSING_PR_CONTEXT.to_string())),
    }
}

fn event_pr_number(path: &Path) -> AppResult<Option<u64>> {
    let contents = fs::read_to_string(path)?;
    let event: Value = serde_json::from_str(&contents).map_err(|err| {
        AppError::Context(format!("invalid event payload {}: {err}", path.display()))
    })?;

    let number = event
        .pointer("/pull_request/number")
        .and_then(Value::as_u64);
    debug!(path = %path.display(), ?number, "read event payload");
    Ok(number)
}

/// Writes step outputs to the `GITHUB_OUTPUT` file, or emits the legacy
/// `::set-output` command when the runner does not provide one.
pub struct StepOutputs {
    file: Option<PathBuf>,
}

impl StepOutputs {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn from_inputs(inputs: &ActionInputs) -> Self {
        Self::new(inputs.get("github_output").map(PathBuf::from))
    }
}

impl OutputSink for StepOutputs {
    fn set_output(&self, name: &str, value: &str) -> AppResult<()> {
        match &self.file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(file_command(name, value).as_bytes())?;
            }
            None => println!("::set-output name={name}::{}", escape_data(value)),
        }
        Ok(())
    }
}

/// Multi-line `name<<DELIMITER` form. The delimiter is derived from the
/// value's hash so it cannot collide with a line of the value.
fn file_command(name: &str, value: &str) -> String {
    let delimiter = format!("ghadelimiter_{}", blake3::hash(value.as_bytes()).to_hex());
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

pub fn report_failure(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
