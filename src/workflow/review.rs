use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::change::{ChangeSetSummary, summarize};
use crate::domain::prompt::{PromptKind, prompts_for};
use crate::domain::pull_request::PullRequestRef;
use crate::domain::usage::annotate_usage;
use crate::error::{AppError, AppResult, CommentKind};
use crate::services::{Completion, CompletionRequest, OVERVIEW_OUTPUT, REVIEW_OUTPUT};

pub struct ReviewWorkflowOutcome {
    pub summary: ChangeSetSummary,
    pub overview: String,
    pub review: String,
}

/// Fetches the change set, generates the overview and the detailed review,
/// exposes both as step outputs, then posts them as two review comments.
///
/// Every step runs to completion before the next starts. Outputs are set
/// before posting, so they survive a failed post.
pub async fn review_pull_request(
    ctx: &AppContext,
    pr: &PullRequestRef,
) -> AppResult<ReviewWorkflowOutcome> {
    info!(pr = %pr, "AI Teammate - starting PR review");

    let files = ctx
        .source_control
        .list_changed_files(pr)
        .await
        .map_err(|err| AppError::Fetch(err.to_string()))?;
    if files.is_empty() {
        warn!("pull request has no changed files");
    }

    let summary = summarize(&files, &ctx.config.summary);
    if summary.truncated {
        warn!(
            included = summary.included_count,
            total = summary.total_count,
            budget = ctx.config.summary.budget_tokens,
            "change set truncated to fit the token budget"
        );
    }

    info!("generating overview and changes");
    let overview = generate(ctx, PromptKind::Overview, &summary).await?;

    info!(depth = %ctx.config.review_depth, "generating detailed review");
    let review = generate(ctx, PromptKind::DetailedReview, &summary).await?;

    let overview = annotate_usage(&overview.content, "Overview", overview.usage.as_ref());
    let review = annotate_usage(&review.content, "Detailed Review", review.usage.as_ref());

    ctx.outputs.set_output(OVERVIEW_OUTPUT, &overview)?;
    ctx.outputs.set_output(REVIEW_OUTPUT, &review)?;

    post(ctx, pr, CommentKind::Overview, &overview).await?;
    post(ctx, pr, CommentKind::DetailedReview, &review).await?;

    info!("AI Teammate review completed");
    Ok(ReviewWorkflowOutcome {
        summary,
        overview,
        review,
    })
}

async fn generate(
    ctx: &AppContext,
    kind: PromptKind,
    summary: &ChangeSetSummary,
) -> AppResult<Completion> {
    let request = CompletionRequest {
        prompts: prompts_for(kind, summary, ctx.config.review_depth),
        depth: ctx.config.review_depth,
        temperature: ctx.config.temperature,
        max_tokens: ctx.config.max_tokens,
    };

    let completion = ctx.language_model.complete(&request).await?;
    if completion.content.trim().is_empty() {
        warn!(?kind, "model returned an empty response");
    }
    Ok(completion)
}

async fn post(
    ctx: &AppContext,
    pr: &PullRequestRef,
    target: CommentKind,
    body: &str,
) -> AppResult<()> {
    info!(%target, "posting review comment");
    ctx.publisher
        .post_review(pr, body)
        .await
        .map_err(|err| AppError::Publish {
            target,
            message: err.to_string(),
        })
}
