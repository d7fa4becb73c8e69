use std::sync::Arc;

use super::{
    error::GenerationError,
    generator::TextGenerator,
    parser::parse_result,
    prompt::{SYSTEM_PROMPT, build_prompt},
};
use crate::domain::{GenerationRequest, GenerationResult};

pub const MAX_STRICT_ATTEMPTS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Advisory,
    Strict(u8),
}

impl Attempt {
    fn is_strict(self) -> bool {
        matches!(self, Attempt::Strict(_))
    }
}

/// How a generation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The returned result satisfies both length bounds.
    Accepted,
    /// Strict attempts ran out; the last result is returned as-is.
    ExhaustedAccepted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub result: GenerationResult,
    pub completion: Completion,
    pub calls: u8,
}

#[derive(Clone)]
pub struct SuggestionGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl SuggestionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// One advisory attempt, then up to two strict ones while a length is out of
    /// bounds. A generator error ends the request.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let mut attempt = Attempt::Advisory;
        let mut calls = 0u8;

        loop {
            calls += 1;
            let result = self.attempt(request, attempt).await?;
            tracing::debug!(
                target: "generation",
                address = %request.address,
                ?attempt,
                title_len = result.ai_title_length,
                meta_len = result.ai_meta_length,
                "attempt parsed"
            );

            attempt = match (attempt, result.within_bounds()) {
                (_, true) => return Ok(self.finish(request, result, Completion::Accepted, calls)),
                (Attempt::Advisory, false) => Attempt::Strict(1),
                (Attempt::Strict(n), false) if n < MAX_STRICT_ATTEMPTS => Attempt::Strict(n + 1),
                (Attempt::Strict(_), false) => {
                    return Ok(self.finish(request, result, Completion::ExhaustedAccepted, calls))
                }
            };
        }
    }

    async fn attempt(
        &self,
        base: &GenerationRequest,
        attempt: Attempt,
    ) -> Result<GenerationResult, GenerationError> {
        let prompt = build_prompt(&base.with_strict(attempt.is_strict()));
        let raw = self.generator.generate(SYSTEM_PROMPT, &prompt).await?;
        Ok(parse_result(raw))
    }

    fn finish(
        &self,
        request: &GenerationRequest,
        result: GenerationResult,
        completion: Completion,
        calls: u8,
    ) -> GenerationOutcome {
        tracing::info!(
            target: "generation",
            address = %request.address,
            model = self.generator.model_name(),
            ?completion,
            calls,
            title_ok = result.title_in_range(),
            meta_ok = result.meta_in_range(),
            "suggestion ready"
        );
        GenerationOutcome {
            result,
            completion,
            calls,
        }
    }
}
