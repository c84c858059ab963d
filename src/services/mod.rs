pub mod credential_store;
pub mod language_model;

pub use credential_store::{API_KEY_ENTRY, CredentialStore};
pub use language_model::LanguageModelService;
