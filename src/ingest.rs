use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::domain::PageRecord;

pub const COL_ADDRESS: &str = "Address";
pub const COL_CONTENT_TYPE: &str = "Content Type";
pub const COL_STATUS_CODE: &str = "Status Code";
pub const COL_TITLE: &str = "Title 1";
pub const COL_H1: &str = "H1-1";
pub const COL_META: &str = "Meta Description 1";
pub const COL_TITLE_LENGTH: &str = "Title 1 Length";
pub const COL_META_LENGTH: &str = "Meta Description 1 Length";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_ADDRESS,
    COL_CONTENT_TYPE,
    COL_STATUS_CODE,
    COL_TITLE,
    COL_H1,
    COL_META,
];

#[derive(Debug, Error)]
#[error("crawl export is missing columns: {}", missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("could not read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

struct ColumnMap {
    address: usize,
    content_type: usize,
    status_code: usize,
    title: usize,
    h1: usize,
    meta: usize,
    title_length: Option<usize>,
    meta_length: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, SchemaError> {
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if idx == 0 {
                    name.trim_start_matches('\u{feff}')
                } else {
                    name
                }
            })
            .collect();
        let find = |wanted: &str| names.iter().position(|name| *name == wanted);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| find(col).is_none())
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError { missing });
        }

        let required = |col: &str| {
            find(col).ok_or_else(|| SchemaError {
                missing: vec![col.to_string()],
            })
        };
        Ok(Self {
            address: required(COL_ADDRESS)?,
            content_type: required(COL_CONTENT_TYPE)?,
            status_code: required(COL_STATUS_CODE)?,
            title: required(COL_TITLE)?,
            h1: required(COL_H1)?,
            meta: required(COL_META)?,
            title_length: find(COL_TITLE_LENGTH),
            meta_length: find(COL_META_LENGTH),
        })
    }

    fn record(&self, row: &StringRecord) -> PageRecord {
        PageRecord {
            address: row.get(self.address).unwrap_or_default().to_string(),
            content_type: text_cell(row, self.content_type),
            status_code: text_cell(row, self.status_code)
                .and_then(|v| parse_count(&v))
                .and_then(|v| u16::try_from(v).ok()),
            title: text_cell(row, self.title),
            h1: text_cell(row, self.h1),
            meta_description: text_cell(row, self.meta),
            title_length: self.title_length.and_then(|idx| count_cell(row, idx)),
            meta_length: self.meta_length.and_then(|idx| count_cell(row, idx)),
        }
    }
}

/// Reads a crawl export. Headers are checked before any row is read, so a
/// schema failure never yields partial records.
pub fn read_crawl_export<R: io::Read>(reader: R) -> Result<Vec<PageRecord>, IngestError> {
    let mut csv = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = ColumnMap::resolve(csv.headers()?)?;

    let mut records = Vec::new();
    for row in csv.records() {
        records.push(columns.record(&row?));
    }
    tracing::info!(target: "ingest", rows = records.len(), "crawl export loaded");
    Ok(records)
}

pub fn load_crawl_export(path: &Path) -> Result<Vec<PageRecord>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_crawl_export(io::BufReader::new(file))
}

fn text_cell(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx).filter(|v| !v.is_empty()).map(str::to_string)
}

fn count_cell(row: &StringRecord, idx: usize) -> Option<usize> {
    text_cell(row, idx).and_then(|v| parse_count(&v))
}

// Crawlers sometimes emit counts as decimals ("45.0").
fn parse_count(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<usize>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as usize)
}
