use thiserror::Error;

/// Failure of the text-generation capability. Never retried by the
/// generation protocol; it ends the current request.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY must be configured to generate suggestions")]
    MissingApiKey,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limit or quota exceeded: {0}")]
    Quota(String),
    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::Quota(body),
            _ => Self::Status { status, body },
        }
    }

    /// Whether asking again later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Quota(_) | Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::MissingApiKey | Self::Auth(_) | Self::MalformedResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes() {
        assert!(matches!(GenerationError::from_status(401, String::new()), GenerationError::Auth(_)));
        assert!(matches!(GenerationError::from_status(403, String::new()), GenerationError::Auth(_)));
        assert!(matches!(GenerationError::from_status(429, String::new()), GenerationError::Quota(_)));
        assert!(matches!(
            GenerationError::from_status(502, "bad gateway".into()),
            GenerationError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn transient_classification() {
        assert!(GenerationError::from_status(429, String::new()).is_transient());
        assert!(GenerationError::from_status(503, String::new()).is_transient());
        assert!(!GenerationError::from_status(400, String::new()).is_transient());
        assert!(!GenerationError::MissingApiKey.is_transient());
    }
}
