use std::{env, path::PathBuf, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, OpenAiConfig, ReviewConfig,
};
use crate::domain::Issue;

const ISSUE_FILTER_KEY: &str = "ISSUE_FILTER";
const BASE_URL_KEY: &str = "OPENAI_BASE_URL";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let crawl_csv = env::var("CRAWL_CSV")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("CRAWL_CSV"))?;

        let openai = OpenAiConfig {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|v| !v.is_empty()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            base_url: parse_base_url(
                &env::var(BASE_URL_KEY)
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            )?,
            timeout: Duration::from_millis(
                env::var("OPENAI_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60_000),
            ),
        };

        let review = ReviewConfig {
            crawl_csv,
            issue_filter: parse_issue_filter(&env::var(ISSUE_FILTER_KEY).unwrap_or_default())?,
            extra_instructions: env::var("EXTRA_INSTRUCTIONS").unwrap_or_default(),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            export_filename: env::var("EXPORT_FILENAME")
                .unwrap_or_else(|_| "ai_seo_optimizations_approved.csv".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(Self {
            openai,
            review,
            directories,
            logging,
        })
    }
}

/// `;`-separated issue labels, e.g. `Missing meta;Title too long`.
pub fn parse_issue_filter(raw: &str) -> Result<Vec<Issue>, ConfigError> {
    let mut issues = Vec::new();
    for part in raw.split(';').map(str::trim).filter(|part| !part.is_empty()) {
        let issue = part.parse::<Issue>().map_err(|_| ConfigError::Invalid {
            key: ISSUE_FILTER_KEY,
            value: part.to_string(),
        })?;
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    }
    Ok(issues)
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::Invalid {
            key: BASE_URL_KEY,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_filter_parses_and_dedups() {
        let issues = parse_issue_filter(" Missing meta ; title too long;;Missing meta").unwrap();
        assert_eq!(issues, vec![Issue::MissingMeta, Issue::TitleTooLong]);
        assert!(parse_issue_filter("").unwrap().is_empty());
    }

    #[test]
    fn issue_filter_rejects_unknown_labels() {
        match parse_issue_filter("Missing meta;Broken links") {
            Err(ConfigError::Invalid { key, value }) => {
                assert_eq!(key, ISSUE_FILTER_KEY);
                assert_eq!(value, "Broken links");
            }
            other => panic!("expected invalid filter, got {other:?}"),
        }
    }

    #[test]
    fn base_url_must_be_http() {
        assert_eq!(
            parse_base_url("https://api.openai.com/v1/").unwrap(),
            "https://api.openai.com/v1"
        );
        assert!(parse_base_url("http://localhost:11434/v1").is_ok());
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
