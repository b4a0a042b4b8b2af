// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for strict_soup
//!
//! The three strict variants (`NoMatches`, `WrongMatchCount`,
//! `MissingAttribute`) are what callers usually match on: they mean the
//! document did not have the shape the caller asked for.

use thiserror::Error;

/// Result type alias for strict_soup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for strict_soup
#[derive(Error, Debug)]
pub enum Error {
    /// A strict select found no matches
    #[error("No matches found for strict_select({selector})")]
    NoMatches { selector: String },

    /// A strict select-one found more (or fewer) than one match
    #[error("Found {count} matches for strict_select_one({selector})")]
    WrongMatchCount { selector: String, count: usize },

    /// A strict attribute lookup found nothing
    #[error("No matches found for strict_get({key})")]
    MissingAttribute { key: String },

    /// Selector parsing error
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// HTML parsing failed
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Operation not available on this node
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a no-matches error
    pub fn no_matches(selector: impl Into<String>) -> Self {
        Error::NoMatches {
            selector: selector.into(),
        }
    }

    /// Create a wrong-match-count error
    pub fn wrong_match_count(selector: impl Into<String>, count: usize) -> Self {
        Error::WrongMatchCount {
            selector: selector.into(),
            count,
        }
    }

    /// Create a missing-attribute error
    pub fn missing_attribute(key: impl Into<String>) -> Self {
        Error::MissingAttribute { key: key.into() }
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::Unsupported(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this came from a strict_* operation failing to find a match
    pub fn is_strict_select(&self) -> bool {
        matches!(
            self,
            Error::NoMatches { .. } | Error::WrongMatchCount { .. } | Error::MissingAttribute { .. }
        )
    }

    /// Check if this is a selector syntax error
    pub fn is_selector(&self) -> bool {
        matches!(self, Error::Selector { .. })
    }

    /// Get the selector involved, if any
    pub fn selector_str(&self) -> Option<&str> {
        match self {
            Error::NoMatches { selector }
            | Error::WrongMatchCount { selector, .. }
            | Error::Selector { selector, .. } => Some(selector),
            _ => None,
        }
    }

    /// Number of matches found, for match-count errors
    pub fn match_count(&self) -> Option<usize> {
        match self {
            Error::NoMatches { .. } => Some(0),
            Error::WrongMatchCount { count, .. } => Some(*count),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            // Strict failures keep their variant so callers can still match on them
            if err.is_strict_select() {
                err
            } else {
                Error::Other(format!("{msg}: {err}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_messages() {
        assert_eq!(
            Error::no_matches("h3").to_string(),
            "No matches found for strict_select(h3)"
        );
        assert_eq!(
            Error::wrong_match_count("h2", 2).to_string(),
            "Found 2 matches for strict_select_one(h2)"
        );
        assert_eq!(
            Error::missing_attribute("value").to_string(),
            "No matches found for strict_get(value)"
        );
    }

    #[test]
    fn test_classification() {
        assert!(Error::no_matches("a").is_strict_select());
        assert!(Error::missing_attribute("href").is_strict_select());
        assert!(!Error::selector("a[", "unterminated").is_strict_select());
        assert!(Error::selector("a[", "unterminated").is_selector());

        assert_eq!(Error::wrong_match_count("li", 3).match_count(), Some(3));
        assert_eq!(Error::no_matches("li").selector_str(), Some("li"));
        assert_eq!(Error::missing_attribute("x").selector_str(), None);
    }

    #[test]
    fn test_context_keeps_strict_errors() {
        let res: std::result::Result<(), Error> = Err(Error::no_matches("p"));
        let err = res.context("loading page").unwrap_err();
        assert!(matches!(err, Error::NoMatches { .. }));

        let res: std::result::Result<(), &str> = Err("boom");
        let err = res.context("loading page").unwrap_err();
        assert_eq!(err.to_string(), "loading page: boom");
    }
}
