use async_trait::async_trait;

use super::error::GenerationError;

/// A text-generation service: one system instruction and one prompt in,
/// one block of text out. The model identifier is bound by the implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}
