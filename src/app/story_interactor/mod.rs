// Story interactor - Text generation only

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for the story command
pub struct StoryInteractor {
    inference_port: Arc<dyn InferencePort>,
    log_port: Arc<dyn LogPort>,
}

impl StoryInteractor {
    pub fn new(inference_port: Arc<dyn InferencePort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            inference_port,
            log_port,
        }
    }

    /// Ask the text-generation backend for a story
    pub async fn execute(&self, prompt: &str) -> Result<Script, DomainError> {
        if prompt.trim().is_empty() {
            return Err(DomainError::BadArgs("Prompt cannot be empty".to_string()));
        }

        self.log_port
            .info(&format!("Generating story for prompt: {}", prompt))
            .await;

        match self.inference_port.generate_text(prompt).await? {
            InferenceResult::Text(text) => Script::new(text),
            _ => Err(DomainError::NoResult(
                "Text generation returned no story".to_string(),
            )),
        }
    }
}
