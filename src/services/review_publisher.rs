use async_trait::async_trait;

use crate::domain::pull_request::PullRequestRef;
use crate::error::AppResult;

#[async_trait]
pub trait ReviewPublisher: Send + Sync {
    async fn post_review(&self, pr: &PullRequestRef, body: &str) -> AppResult<()>;
}

/// Prints review bodies instead of posting them (`--dry-run`).
pub struct StdoutPublisher;

#[async_trait]
impl ReviewPublisher for StdoutPublisher {
    async fn post_review(&self, pr: &PullRequestRef, body: &str) -> AppResult<()> {
        println!("----- review comment for {pr} -----");
        println!("{body}");
        Ok(())
    }
}
