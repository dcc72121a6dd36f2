use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{LanguageModelService, OutputSink, ReviewPublisher, SourceControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub source_control: Arc<dyn SourceControlService>,
    pub language_model: Arc<dyn LanguageModelService>,
    pub publisher: Arc<dyn ReviewPublisher>,
    pub outputs: Arc<dyn OutputSink>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        source_control: Arc<dyn SourceControlService>,
        language_model: Arc<dyn LanguageModelService>,
        publisher: Arc<dyn ReviewPublisher>,
        outputs: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            config,
            source_control,
            language_model,
            publisher,
            outputs,
        }
    }
}
