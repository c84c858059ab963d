pub mod classifier;
pub mod comments;
pub mod document;
pub mod extractor;

pub use classifier::is_jira_page;
pub use document::PageDocument;
pub use extractor::extract_ticket;
