pub mod credentials;
pub mod groq;
