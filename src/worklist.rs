use std::collections::BTreeSet;

use crate::domain::{
    Issue, IssueSet, PageRecord, WorklistEntry,
    bounds::{LengthBounds, LengthVerdict, META_BOUNDS, TITLE_BOUNDS, char_len},
};

const HTML_CONTENT_TYPE: &str = "text/html";
const STATUS_OK: u16 = 200;

/// Filters crawl rows down to HTML/200 pages with a missing or badly sized
/// title or meta description. Input order is preserved.
pub fn build(rows: &[PageRecord]) -> Vec<WorklistEntry> {
    let entries: Vec<WorklistEntry> = rows
        .iter()
        .filter(|row| is_html(row) && row.status_code == Some(STATUS_OK))
        .filter_map(classify)
        .collect();

    tracing::info!(
        target: "worklist",
        rows = rows.len(),
        flagged = entries.len(),
        "worklist built"
    );
    entries
}

/// Keeps entries carrying any of `wanted`; an empty filter keeps everything.
pub fn filter_by_issues<'a>(
    entries: &'a [WorklistEntry],
    wanted: &[Issue],
) -> Vec<&'a WorklistEntry> {
    entries
        .iter()
        .filter(|entry| {
            wanted.is_empty() || wanted.iter().any(|issue| entry.issues.contains(*issue))
        })
        .collect()
}

/// Distinct issues present in the worklist, in check order.
pub fn issue_catalog(entries: &[WorklistEntry]) -> Vec<Issue> {
    entries
        .iter()
        .flat_map(|entry| entry.issues.iter())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn is_html(row: &PageRecord) -> bool {
    row.content_type
        .as_deref()
        .is_some_and(|ct| ct.contains(HTML_CONTENT_TYPE))
}

fn classify(row: &PageRecord) -> Option<WorklistEntry> {
    let title_length = row
        .title_length
        .unwrap_or_else(|| row.title.as_deref().map(char_len).unwrap_or(0));
    let meta_length = row
        .meta_length
        .unwrap_or_else(|| row.meta_description.as_deref().map(char_len).unwrap_or(0));

    let issues = IssueSet::classify(
        is_missing(row.title.as_deref()),
        length_issue(TITLE_BOUNDS, title_length, Issue::TitleTooShort, Issue::TitleTooLong),
        is_missing(row.meta_description.as_deref()),
        length_issue(META_BOUNDS, meta_length, Issue::MetaTooShort, Issue::MetaTooLong),
    );
    if issues.is_empty() {
        return None;
    }

    // Only the listed fields propagate; content type is dropped here.
    Some(WorklistEntry {
        address: row.address.clone(),
        status_code: STATUS_OK,
        title: row.title.clone(),
        h1: row.h1.clone(),
        meta_description: row.meta_description.clone(),
        title_length,
        meta_length,
        issues,
    })
}

// Whitespace-only values are not missing.
fn is_missing(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

fn length_issue(bounds: LengthBounds, len: usize, short: Issue, long: Issue) -> Option<Issue> {
    match bounds.verdict(len) {
        LengthVerdict::TooShort => Some(short),
        LengthVerdict::TooLong => Some(long),
        LengthVerdict::InRange => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(address: &str, title: Option<&str>, meta: Option<&str>) -> PageRecord {
        PageRecord {
            address: address.to_string(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            status_code: Some(200),
            title: title.map(str::to_string),
            h1: Some("Heading".to_string()),
            meta_description: meta.map(str::to_string),
            title_length: None,
            meta_length: None,
        }
    }

    fn good_title() -> String {
        "A perfectly reasonable page title here".to_string()
    }

    fn good_meta() -> String {
        "m".repeat(100)
    }

    #[test]
    fn empty_input_yields_empty_worklist() {
        assert!(build(&[]).is_empty());
    }

    #[test]
    fn drops_non_html_and_non_200_rows() {
        let mut pdf = page("https://a/doc.pdf", None, None);
        pdf.content_type = Some("application/pdf".to_string());
        let mut redirect = page("https://a/old", None, None);
        redirect.status_code = Some(301);
        let mut no_type = page("https://a/unknown", None, None);
        no_type.content_type = None;
        let mut no_status = page("https://a/blocked", None, None);
        no_status.status_code = None;
        let kept = page("https://a/", None, None);

        let worklist = build(&[pdf, redirect, no_type, no_status, kept]);
        assert_eq!(worklist.len(), 1);
        assert_eq!(worklist[0].address, "https://a/");
        assert!(worklist.iter().all(|e| e.status_code == 200));
    }

    #[test]
    fn content_type_match_is_case_sensitive() {
        let mut upper = page("https://a/", None, None);
        upper.content_type = Some("TEXT/HTML".to_string());
        assert!(build(&[upper]).is_empty());
    }

    #[test]
    fn pages_without_issues_are_dropped() {
        let clean = page("https://a/", Some(good_title().as_str()), Some(good_meta().as_str()));
        assert!(build(&[clean]).is_empty());
    }

    #[test]
    fn missing_title_excludes_title_length_issues() {
        let worklist = build(&[page("https://a/", Some(""), Some(good_meta().as_str()))]);
        let issues = &worklist[0].issues;
        assert!(issues.contains(Issue::MissingTitle));
        assert!(!issues.contains(Issue::TitleTooShort));
        assert!(!issues.contains(Issue::TitleTooLong));
        assert_eq!(issues.to_string(), "Missing title");
    }

    #[test]
    fn whitespace_title_is_short_not_missing() {
        let worklist = build(&[page("https://a/", Some("   "), Some(good_meta().as_str()))]);
        assert_eq!(worklist[0].issues.to_string(), "Title too short");
        assert_eq!(worklist[0].title_length, 3);
    }

    #[test]
    fn supplied_lengths_are_trusted_verbatim() {
        let mut row = page("https://a/", Some("short"), Some(good_meta().as_str()));
        row.title_length = Some(45);
        row.meta_length = Some(200);
        let worklist = build(&[row]);
        assert_eq!(worklist[0].title_length, 45);
        assert_eq!(worklist[0].issues.to_string(), "Meta too long");
    }

    #[test]
    fn labels_follow_check_order_and_input_order_is_kept() {
        let rows = vec![
            page("https://a/1", Some("x".repeat(70).as_str()), None),
            page("https://a/2", Some("tiny"), Some("short meta")),
        ];
        let worklist = build(&rows);
        assert_eq!(worklist[0].address, "https://a/1");
        assert_eq!(worklist[0].issues.to_string(), "Title too long, Missing meta");
        assert_eq!(worklist[1].issues.to_string(), "Title too short, Meta too short");
    }

    #[test]
    fn build_is_deterministic() {
        let rows = vec![
            page("https://a/1", None, None),
            page("https://a/2", Some("tiny"), Some(good_meta().as_str())),
        ];
        assert_eq!(build(&rows), build(&rows));
    }

    #[test]
    fn filter_narrows_without_mutating() {
        let rows = vec![
            page("https://a/1", None, Some(good_meta().as_str())),
            page("https://a/2", Some(good_title().as_str()), None),
            page("https://a/3", Some("tiny"), Some(good_meta().as_str())),
        ];
        let worklist = build(&rows);

        let missing_meta = filter_by_issues(&worklist, &[Issue::MissingMeta]);
        assert_eq!(missing_meta.len(), 1);
        assert_eq!(missing_meta[0].address, "https://a/2");

        let either = filter_by_issues(&worklist, &[Issue::MissingTitle, Issue::TitleTooShort]);
        assert_eq!(either.len(), 2);
        assert_eq!(filter_by_issues(&worklist, &[]).len(), 3);
        assert_eq!(worklist.len(), 3);
    }

    #[test]
    fn catalog_lists_distinct_issues_in_check_order() {
        let rows = vec![
            page("https://a/1", Some("tiny"), None),
            page("https://a/2", None, None),
        ];
        let catalog = issue_catalog(&build(&rows));
        assert_eq!(
            catalog,
            vec![Issue::MissingTitle, Issue::TitleTooShort, Issue::MissingMeta]
        );
    }
}
