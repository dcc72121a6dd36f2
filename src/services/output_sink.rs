use crate::error::AppResult;

pub const OVERVIEW_OUTPUT: &str = "overview";
pub const REVIEW_OUTPUT: &str = "review";

/// Named string outputs exposed to the invoking workflow.
pub trait OutputSink: Send + Sync {
    fn set_output(&self, name: &str, value: &str) -> AppResult<()>;
}
