pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, LoggingConfig, OpenAiConfig};
pub use loader::load_config;
