use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("not on a JIRA ticket page: {0}")]
    NotJiraPage(String),
    #[error("could not extract JIRA ticket information")]
    NoTicketContent,
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("credential store error: {0}")]
    Credentials(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
