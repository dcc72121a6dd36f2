pub mod change;
pub mod prompt;
pub mod pull_request;
pub mod review;
pub mod usage;
