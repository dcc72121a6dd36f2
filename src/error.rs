use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Overview,
    DetailedReview,
}

impl CommentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentKind::Overview => "overview",
            CommentKind::DetailedReview => "detailed review",
        }
    }
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Context(String),
    #[error("{0}")]
    SourceControl(String),
    #[error("Failed to fetch PR files: {0}")]
    Fetch(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("Failed to post {target}: {message}")]
    Publish { target: CommentKind, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_errors_name_the_failed_comment() {
        let overview = AppError::Publish {
            target: CommentKind::Overview,
            message: "API Error".to_string(),
        };
        let review = AppError::Publish {
            target: CommentKind::DetailedReview,
            message: "API Error".to_string(),
        };

        assert_eq!(overview.to_string(), "Failed to post overview: API Error");
        assert_eq!(
            review.to_string(),
            "Failed to post detailed review: API Error"
        );
    }

    #[test]
    fn fetch_errors_are_prefixed() {
        let err = AppError::Fetch("GitHub responded with 404".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to fetch PR files: GitHub responded with 404"
        );
    }
}
