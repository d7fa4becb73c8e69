use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::GenerationResult;

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_`]").expect("valid emphasis regex"));
static LABEL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\-\d\)\.\s]+").expect("valid label prefix regex"));
// Value lines only lose a real list marker; "10 Best Widgets" stays intact.
static VALUE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[\-•+]|\d+[\.\)])\s+").expect("valid value marker regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Meta,
    PrimaryKeyword,
    SecondaryKeyword,
}

impl Field {
    const LABELS: [(&'static str, Field); 4] = [
        ("title:", Field::Title),
        ("meta:", Field::Meta),
        ("primary keyword", Field::PrimaryKeyword),
        ("secondary keyword", Field::SecondaryKeyword),
    ];

    fn detect(line: &str) -> Option<Field> {
        let normalized = normalize_label(line);
        Self::LABELS
            .iter()
            .find(|(prefix, _)| normalized.starts_with(prefix))
            .map(|(_, field)| *field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Idle,
    Awaiting(Field),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    pub title: Option<String>,
    pub meta: Option<String>,
    pub primary_keyword: Option<String>,
    pub secondary_keyword: Option<String>,
}

impl ParsedFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Meta => &mut self.meta,
            Field::PrimaryKeyword => &mut self.primary_keyword,
            Field::SecondaryKeyword => &mut self.secondary_keyword,
        }
    }

    /// First value wins; later values for a filled field are dropped.
    fn fill(&mut self, field: Field, value: String) {
        let slot = self.slot(field);
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn is_filled(&self, field: Field) -> bool {
        match field {
            Field::Title => self.title.is_some(),
            Field::Meta => self.meta.is_some(),
            Field::PrimaryKeyword => self.primary_keyword.is_some(),
            Field::SecondaryKeyword => self.secondary_keyword.is_some(),
        }
    }

    pub fn into_result(self, raw_text: String) -> GenerationResult {
        GenerationResult::new(
            self.title,
            self.meta,
            self.primary_keyword,
            self.secondary_keyword,
            raw_text,
        )
    }
}

/// Walks the lines once, with a cursor naming the field awaiting a value.
/// Never fails: fields that cannot be found stay `None`.
pub fn parse(raw: &str) -> ParsedFields {
    let mut fields = ParsedFields::default();
    let mut cursor = Cursor::Idle;

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        cursor = match (Field::detect(line), cursor) {
            (Some(field), _) => match inline_value(line) {
                Some(value) => {
                    fields.fill(field, value);
                    Cursor::Idle
                }
                None if fields.is_filled(field) => Cursor::Idle,
                None => Cursor::Awaiting(field),
            },
            (None, Cursor::Awaiting(field)) => {
                let value = value_line(line);
                if !value.is_empty() {
                    fields.fill(field, value);
                }
                Cursor::Idle
            }
            (None, Cursor::Idle) => Cursor::Idle,
        };
    }
    fields
}

pub fn parse_result(raw: String) -> GenerationResult {
    parse(&raw).into_result(raw)
}

fn normalize_label(line: &str) -> String {
    let lowered = line.trim().to_lowercase();
    let stripped = EMPHASIS.replace_all(&lowered, "");
    LABEL_PREFIX.replace(&stripped, "").into_owned()
}

fn strip_emphasis(text: &str) -> String {
    EMPHASIS.replace_all(text, "").trim().to_string()
}

fn inline_value(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, rest)| strip_emphasis(rest))
        .filter(|value| !value.is_empty())
}

fn value_line(line: &str) -> String {
    let plain = strip_emphasis(line);
    VALUE_MARKER.replace(&plain, "").trim().to_string()
}
