use chrono::{DateTime, Utc};

use super::{
    bounds::{META_BOUNDS, TITLE_BOUNDS, char_len},
    issue::IssueSet,
    page::WorklistEntry,
};

/// Everything one generation attempt needs; built fresh per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub address: String,
    pub h1: Option<String>,
    pub current_title: Option<String>,
    pub current_meta: Option<String>,
    pub issues: IssueSet,
    pub extra_instructions: String,
    pub strict: bool,
}

impl GenerationRequest {
    pub fn from_entry(entry: &WorklistEntry, extra_instructions: impl Into<String>) -> Self {
        Self {
            address: entry.address.clone(),
            h1: entry.h1.clone(),
            current_title: entry.title.clone(),
            current_meta: entry.meta_description.clone(),
            issues: entry.issues.clone(),
            extra_instructions: extra_instructions.into(),
            strict: false,
        }
    }

    pub fn with_strict(&self, strict: bool) -> Self {
        Self {
            strict,
            ..self.clone()
        }
    }
}

/// Structured suggestion parsed out of one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub ai_title: Option<String>,
    pub ai_meta: Option<String>,
    pub ai_title_length: usize,
    pub ai_meta_length: usize,
    pub primary_keyword: Option<String>,
    pub secondary_keyword: Option<String>,
    pub raw_text: String,
}

impl GenerationResult {
    pub fn new(
        ai_title: Option<String>,
        ai_meta: Option<String>,
        primary_keyword: Option<String>,
        secondary_keyword: Option<String>,
        raw_text: String,
    ) -> Self {
        Self {
            ai_title_length: ai_title.as_deref().map(char_len).unwrap_or(0),
            ai_meta_length: ai_meta.as_deref().map(char_len).unwrap_or(0),
            ai_title,
            ai_meta,
            primary_keyword,
            secondary_keyword,
            raw_text,
        }
    }

    pub fn title_in_range(&self) -> bool {
        TITLE_BOUNDS.contains(self.ai_title_length)
    }

    pub fn meta_in_range(&self) -> bool {
        META_BOUNDS.contains(self.ai_meta_length)
    }

    pub fn within_bounds(&self) -> bool {
        self.title_in_range() && self.meta_in_range()
    }
}

/// Snapshot of a worklist page together with the suggestion the operator approved.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovedItem {
    pub address: String,
    pub issues: IssueSet,
    pub original_title: Option<String>,
    pub original_meta: Option<String>,
    pub original_title_length: usize,
    pub original_meta_length: usize,
    pub result: GenerationResult,
    pub approved_at: DateTime<Utc>,
}

impl ApprovedItem {
    pub fn new(entry: &WorklistEntry, result: GenerationResult, approved_at: DateTime<Utc>) -> Self {
        Self {
            address: entry.address.clone(),
            issues: entry.issues.clone(),
            original_title: entry.title.clone(),
            original_meta: entry.meta_description.clone(),
            original_title_length: entry.title_length,
            original_meta_length: entry.meta_length,
            result,
            approved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_have_zero_length_and_fail_bounds() {
        let result = GenerationResult::new(None, None, None, None, String::new());
        assert_eq!(result.ai_title_length, 0);
        assert_eq!(result.ai_meta_length, 0);
        assert!(!result.within_bounds());
    }

    #[test]
    fn within_bounds_requires_both_fields() {
        let title = "t".repeat(45);
        let meta = "m".repeat(100);
        let ok = GenerationResult::new(Some(title.clone()), Some(meta), None, None, String::new());
        assert!(ok.within_bounds());

        let short_meta =
            GenerationResult::new(Some(title), Some("m".repeat(69)), None, None, String::new());
        assert!(short_meta.title_in_range());
        assert!(!short_meta.meta_in_range());
        assert!(!short_meta.within_bounds());
    }
}
