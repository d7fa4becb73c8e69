use super::issue::IssueSet;

/// One row of the crawl export, as read. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    pub address: String,
    pub content_type: Option<String>,
    pub status_code: Option<u16>,
    pub title: Option<String>,
    pub h1: Option<String>,
    pub meta_description: Option<String>,
    /// Crawler-supplied title length, trusted verbatim when present.
    pub title_length: Option<usize>,
    pub meta_length: Option<usize>,
}

/// An HTML, 200-status page with at least one title/meta issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklistEntry {
    pub address: String,
    pub status_code: u16,
    pub title: Option<String>,
    pub h1: Option<String>,
    pub meta_description: Option<String>,
    pub title_length: usize,
    pub meta_length: usize,
    pub issues: IssueSet,
}
