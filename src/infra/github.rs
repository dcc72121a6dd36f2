use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Secret;
use crate::domain::change::{FileChange, FileStatus};
use crate::domain::pull_request::PullRequestRef;
use crate::error::{AppError, AppResult};
use crate::services::{ReviewPublisher, SourceControlService};

const PER_PAGE: usize = 100;
// The files endpoint stops listing after 3000 entries.
const MAX_PAGES: usize = 30;
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    http: Client,
    base_api: String,
    token: Secret,
}

impl GitHubClient {
    pub fn new(base_api: &str, token: Secret, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn pulls_endpoint(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, pr.owner, pr.repo, pr.number
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, concat!("ai-teammate/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn files_page(&self, pr: &PullRequestRef, page: usize) -> AppResult<Vec<GitHubPrFile>> {
        let url = format!(
            "{}/files?per_page={PER_PAGE}&page={page}",
            self.pulls_endpoint(pr)
        );
        debug!(%url, "GitHub list files");

        let response = self
            .request(self.http.get(&url))
            .send()
            .await
            .map_err(|err| AppError::SourceControl(format!("failed to call GitHub: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::SourceControl(format!(
                "GitHub responded with {status}: {body}"
            )));
        }

        response.json().await.map_err(|err| {
            AppError::SourceControl(format!("failed to parse GitHub response: {err}"))
        })
    }
}

#[async_trait]
impl SourceControlService for GitHubClient {
    async fn list_changed_files(&self, pr: &PullRequestRef) -> AppResult<Vec<FileChange>> {
        let mut changes = Vec::new();

        for page in 1..=MAX_PAGES {
            let files = self.files_page(pr, page).await?;
            let last_page = files.len() < PER_PAGE;
            changes.extend(files.into_iter().map(FileChange::from));
            if last_page {
                break;
            }
        }

        debug!(pr = %pr, files = changes.len(), "listed pull request files");
        Ok(changes)
    }
}

#[async_trait]
impl ReviewPublisher for GitHubClient {
    async fn post_review(&self, pr: &PullRequestRef, body: &str) -> AppResult<()> {
        let url = format!("{}/reviews", self.pulls_endpoint(pr));
        debug!(%url, body_len = body.len(), "GitHub create review");

        let response = self
            .request(self.http.post(&url))
            .json(&CreateReviewRequest {
                body,
                event: "COMMENT",
            })
            .send()
            .await
            .map_err(|err| AppError::SourceControl(format!("failed to call GitHub: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::SourceControl(format!(
                "GitHub responded with {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct CreateReviewRequest<'a> {
    body: &'a str,
    event: &'static str,
}

#[derive(Deserialize)]
struct GitHubPrFile {
    filename: String,
    status: String,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    patch: Option<String>,
}

impl From<GitHubPrFile> for FileChange {
    fn from(file: GitHubPrFile) -> Self {
        Self {
            path: file.filename,
            lines_added: file.additions,
            lines_removed: file.deletions,
            status: FileStatus::from_api(&file.status),
            patch: file.patch,
        }
    }
}
