use async_trait::async_trait;

use crate::domain::change::FileChange;
use crate::domain::pull_request::PullRequestRef;
use crate::error::AppResult;

#[async_trait]
pub trait SourceControlService: Send + Sync {
    /// Changed files of the pull request, in the order the host lists them.
    async fn list_changed_files(&self, pr: &PullRequestRef) -> AppResult<Vec<FileChange>>;
}
