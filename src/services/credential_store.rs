use crate::error::AppResult;

pub const API_KEY_ENTRY: &str = "groq_api_key";

/// Small key-value store for secrets such as the summarizer API key.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}
