use async_trait::async_trait;

use crate::error::AppResult;

/// Text-completion backend that turns a ticket prompt into a sectioned summary.
#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn summarize(&self, prompt: &str) -> AppResult<String>;
}
