use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes carried on the wire and asserted in tests. Grouped
/// by failure class: the article codes are the only fatal ones, everything
/// else degrades in place during a walk.
pub mod codes {
    pub const ARTICLE_NOT_FOUND: &str = "ARTICLE_NOT_FOUND";
    pub const ARTICLE_INVALID: &str = "ARTICLE_INVALID";

    pub const CHAT_FAILED: &str = "CHAT_FAILED";
    pub const EMBEDDINGS_FAILED: &str = "EMBEDDINGS_FAILED";
    pub const GUIDELINE_SEARCH_FAILED: &str = "GUIDELINE_SEARCH_FAILED";
}

/// Single structured error shape used across all layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// True for the input-failure class that aborts a walk before it
    /// starts; every other class is recovered locally.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.code.as_str(),
            codes::ARTICLE_NOT_FOUND | codes::ARTICLE_INVALID
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_article_codes_are_fatal() {
        assert!(AppError::new(codes::ARTICLE_NOT_FOUND, "m").is_fatal());
        assert!(AppError::new(codes::ARTICLE_INVALID, "m").is_fatal());
        assert!(!AppError::new(codes::GUIDELINE_SEARCH_FAILED, "m").is_fatal());
        assert!(!AppError::new(codes::CHAT_FAILED, "m").is_fatal());
    }
}
