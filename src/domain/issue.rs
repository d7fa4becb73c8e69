use std::{fmt, str::FromStr};

use thiserror::Error;

/// A single reason a page was put on the worklist. Variant order is the
/// order checks run in, so sorting issues reproduces the label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Issue {
    MissingTitle,
    TitleTooShort,
    TitleTooLong,
    MissingMeta,
    MetaTooShort,
    MetaTooLong,
}

impl Issue {
    pub const ALL: [Issue; 6] = [
        Issue::MissingTitle,
        Issue::TitleTooShort,
        Issue::TitleTooLong,
        Issue::MissingMeta,
        Issue::MetaTooShort,
        Issue::MetaTooLong,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Issue::MissingTitle => "Missing title",
            Issue::TitleTooShort => "Title too short",
            Issue::TitleTooLong => "Title too long",
            Issue::MissingMeta => "Missing meta",
            Issue::MetaTooShort => "Meta too short",
            Issue::MetaTooLong => "Meta too long",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown issue label: {0:?}")]
pub struct UnknownIssue(pub String);

impl FromStr for Issue {
    type Err = UnknownIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Issue::ALL
            .into_iter()
            .find(|issue| issue.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownIssue(wanted.to_string()))
    }
}

/// Ordered issue labels for one page. A "missing" issue for a field
/// excludes the length issues of that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueSet(Vec<Issue>);

impl IssueSet {
    /// Builds the set from per-field findings. A length verdict is only
    /// consulted when its field is present.
    pub fn classify(
        title_missing: bool,
        title_verdict: Option<Issue>,
        meta_missing: bool,
        meta_verdict: Option<Issue>,
    ) -> Self {
        let mut issues = Vec::with_capacity(2);
        if title_missing {
            issues.push(Issue::MissingTitle);
        } else if let Some(issue) = title_verdict {
            issues.push(issue);
        }
        if meta_missing {
            issues.push(Issue::MissingMeta);
        } else if let Some(issue) = meta_verdict {
            issues.push(issue);
        }
        Self(issues)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, issue: Issue) -> bool {
        self.0.contains(&issue)
    }

    pub fn iter(&self) -> impl Iterator<Item = Issue> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for IssueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(issue.label())?;
        }
        Ok(())
    }
}
