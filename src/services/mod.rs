pub mod language_model;
pub mod output_sink;
pub mod review_publisher;
pub mod source_control;

pub use language_model::{Completion, CompletionRequest, LanguageModelService};
pub use output_sink::{OVERVIEW_OUTPUT, OutputSink, REVIEW_OUTPUT};
pub use review_publisher::{ReviewPublisher, StdoutPublisher};
pub use source_control::SourceControlService;
