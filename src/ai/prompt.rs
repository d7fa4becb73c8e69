use crate::domain::{GenerationRequest, META_BOUNDS, TITLE_BOUNDS};

pub const SYSTEM_PROMPT: &str =
    "You write concise, search-optimized titles and meta descriptions.";

pub const LABEL_TITLE: &str = "Title:";
pub const LABEL_META: &str = "Meta:";
pub const LABEL_PRIMARY_KEYWORD: &str = "Primary Keyword:";
pub const LABEL_SECONDARY_KEYWORD: &str = "Secondary Keyword:";

const NONE_PLACEHOLDER: &str = "(none)";

/// Both variants ask for the four labelled fields in parser order.
pub fn build_prompt(request: &GenerationRequest) -> String {
    if request.strict {
        strict_prompt(request)
    } else {
        advisory_prompt(request)
    }
}

fn advisory_prompt(request: &GenerationRequest) -> String {
    format!(
        "You are an expert SEO strategist.

URL:
{url}

H1:
{h1}

Current Title:
{title}

Current Meta:
{meta}

Issues detected: {issues}

Extra instructions: {extra}

Please respond with:

{LABEL_TITLE}
[Optimized SEO title, ideally {title_min}-{title_max} chars]

{LABEL_META}
[Optimized meta description, ideally {meta_min}-{meta_max} chars]

{LABEL_PRIMARY_KEYWORD}
[One main keyword]

{LABEL_SECONDARY_KEYWORD}
[One supporting keyword]
",
        url = request.address,
        h1 = or_none(request.h1.as_deref()),
        title = or_none(request.current_title.as_deref()),
        meta = or_none(request.current_meta.as_deref()),
        issues = request.issues,
        extra = request.extra_instructions,
        title_min = TITLE_BOUNDS.min,
        title_max = TITLE_BOUNDS.max,
        meta_min = META_BOUNDS.min,
        meta_max = META_BOUNDS.max,
    )
}

fn strict_prompt(request: &GenerationRequest) -> String {
    format!(
        "You MUST follow these length rules:
- Title length MUST be between {title_min} and {title_max} characters (inclusive).
- Meta length MUST be between {meta_min} and {meta_max} characters (inclusive).

Do NOT use markdown. Do NOT use bullets. Use plain labels exactly like this:

{LABEL_TITLE}
<text>

{LABEL_META}
<text>

{LABEL_PRIMARY_KEYWORD}
<text>

{LABEL_SECONDARY_KEYWORD}
<text>

URL: {url}
H1: {h1}
Current Title: {title}
Current Meta: {meta}
Issues: {issues}

Extra instructions: {extra}
",
        url = request.address,
        h1 = or_none(request.h1.as_deref()),
        title = or_none(request.current_title.as_deref()),
        meta = or_none(request.current_meta.as_deref()),
        issues = request.issues,
        extra = request.extra_instructions,
        title_min = TITLE_BOUNDS.min,
        title_max = TITLE_BOUNDS.max,
        meta_min = META_BOUNDS.min,
        meta_max = META_BOUNDS.max,
    )
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or(NONE_PLACEHOLDER)
}
