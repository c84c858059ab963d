pub mod prompt;
pub mod summary;
pub mod ticket;
