pub mod actions;
pub mod github;
pub mod llm;
