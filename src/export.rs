use std::{fs::File, io, path::Path};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ApprovedItem, GenerationResult, WorklistEntry};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Approved suggestions for one session. Append-only: items are never
/// edited or removed once approved.
#[derive(Debug, Default)]
pub struct ApprovedLedger {
    items: Vec<ApprovedItem>,
}

impl ApprovedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approve(&mut self, entry: &WorklistEntry, result: GenerationResult) -> &ApprovedItem {
        self.approve_at(entry, result, Utc::now())
    }

    fn approve_at(
        &mut self,
        entry: &WorklistEntry,
        result: GenerationResult,
        approved_at: DateTime<Utc>,
    ) -> &ApprovedItem {
        self.items.push(ApprovedItem::new(entry, result, approved_at));
        tracing::info!(
            target: "export",
            address = %entry.address,
            approved = self.items.len(),
            "suggestion approved"
        );
        &self.items[self.items.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ApprovedItem] {
        &self.items
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        if self.items.is_empty() {
            csv.write_record(EXPORT_HEADERS)?;
        }
        for item in &self.items {
            csv.serialize(ExportRow::from(item))?;
        }
        csv.flush().map_err(|source| ExportError::Io {
            path: "<writer>".to_string(),
            source,
        })?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        let io_error = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        self.write_csv(io::BufWriter::new(file))?;
        tracing::info!(
            target: "export",
            path = %path.display(),
            rows = self.items.len(),
            "approved suggestions exported"
        );
        Ok(())
    }
}

const EXPORT_HEADERS: [&str; 14] = [
    "Address",
    "Issue Type",
    "Original Title",
    "Original Meta Description",
    "Original Title Length",
    "Original Meta Length",
    "AI Title",
    "AI Meta Description",
    "AI Title Length",
    "AI Meta Length",
    "Primary Keyword",
    "Secondary Keyword",
    "Raw Output",
    "Approved At",
];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Issue Type")]
    issue_type: String,
    #[serde(rename = "Original Title")]
    original_title: Option<&'a str>,
    #[serde(rename = "Original Meta Description")]
    original_meta: Option<&'a str>,
    #[serde(rename = "Original Title Length")]
    original_title_length: usize,
    #[serde(rename = "Original Meta Length")]
    original_meta_length: usize,
    #[serde(rename = "AI Title")]
    ai_title: Option<&'a str>,
    #[serde(rename = "AI Meta Description")]
    ai_meta: Option<&'a str>,
    #[serde(rename = "AI Title Length")]
    ai_title_length: usize,
    #[serde(rename = "AI Meta Length")]
    ai_meta_length: usize,
    #[serde(rename = "Primary Keyword")]
    primary_keyword: Option<&'a str>,
    #[serde(rename = "Secondary Keyword")]
    secondary_keyword: Option<&'a str>,
    #[serde(rename = "Raw Output")]
    raw_output: &'a str,
    #[serde(rename = "Approved At")]
    approved_at: String,
}

impl<'a> From<&'a ApprovedItem> for ExportRow<'a> {
    fn from(item: &'a ApprovedItem) -> Self {
        let result = &item.result;
        Self {
            address: &item.address,
            issue_type: item.issues.to_string(),
            original_title: item.original_title.as_deref(),
            original_meta: item.original_meta.as_deref(),
            original_title_length: item.original_title_length,
            original_meta_length: item.original_meta_length,
            ai_title: result.ai_title.as_deref(),
            ai_meta: result.ai_meta.as_deref(),
            ai_title_length: result.ai_title_length,
            ai_meta_length: result.ai_meta_length,
            primary_keyword: result.primary_keyword.as_deref(),
            secondary_keyword: result.secondary_keyword.as_deref(),
            raw_output: &result.raw_text,
            approved_at: item.approved_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
