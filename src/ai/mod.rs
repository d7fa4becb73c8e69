pub mod client;
pub mod error;
pub mod generator;
pub mod inference;
#[cfg(test)]
pub mod mock;
pub mod parser;
pub mod prompt;
pub mod retry;

pub use client::OpenAiClient;
pub use retry::{Completion, GenerationOutcome, SuggestionGenerator};
