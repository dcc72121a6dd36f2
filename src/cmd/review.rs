use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::info;

use crate::config::{ActionInputs, AppConfig};
use crate::context::AppContext;
use crate::domain::review::ReviewDepth;
use crate::error::AppResult;
use crate::infra::actions::{StepOutputs, resolve_pull_request};
use crate::infra::github::GitHubClient;
use crate::infra::llm::ChatCompletionClient;
use crate::services::{ReviewPublisher, StdoutPublisher};
use crate::workflow::review::{ReviewWorkflowOutcome, review_pull_request};

#[derive(Args, Debug, Clone, Default)]
pub struct ReviewArgs {
    /// Review this pull request instead of the one in the event payload.
    #[arg(long)]
    pub pr_number: Option<u64>,
    /// Override the review_depth input (basic, comprehensive, expert).
    #[arg(long)]
    pub review_depth: Option<String>,
    /// Print the comments instead of posting them.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(mut inputs: ActionInputs, args: ReviewArgs) -> AppResult<ReviewWorkflowOutcome> {
    if let Some(depth) = &args.review_depth {
        inputs.set("review_depth", ReviewDepth::from_input(depth).as_str());
    }

    let config = AppConfig::from_inputs(&inputs)?;
    let pr = resolve_pull_request(&inputs, args.pr_number)?;
    info!(pr = %pr, depth = %config.review_depth, "analyzing pull request");

    let github = Arc::new(GitHubClient::new(
        &config.github_api_url,
        config.github_token.clone(),
        Duration::from_secs(config.llm.request_timeout_secs),
    )?);
    let language_model = Arc::new(ChatCompletionClient::new(&config.llm)?);
    let publisher: Arc<dyn ReviewPublisher> = if args.dry_run {
        Arc::new(StdoutPublisher)
    } else {
        github.clone()
    };
    let outputs = Arc::new(StepOutputs::from_inputs(&inputs));

    let ctx = AppContext::new(config, github, language_model, publisher, outputs);
    review_pull_request(&ctx, &pr).await
}
