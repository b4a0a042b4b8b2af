// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Parser configuration

use std::env;

use url::Url;

use crate::error::{Error, Result};

/// Environment variable selecting the parse mode
pub const ENV_MODE: &str = "STRICT_SOUP_MODE";
/// Environment variable holding the base URL
pub const ENV_BASE_URL: &str = "STRICT_SOUP_BASE_URL";

/// How markup is turned into a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Full document: html, head and body are always present
    #[default]
    Document,
    /// Markup parsed in a body context, no wrapper elements added
    Fragment,
}

impl ParseMode {
    /// Parse a mode name (`document` or `fragment`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "document" | "doc" => Some(ParseMode::Document),
            "fragment" | "frag" => Some(ParseMode::Fragment),
            _ => None,
        }
    }
}

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Parse mode
    pub mode: ParseMode,
    /// Base URL for resolving relative links
    pub base_url: Option<Url>,
    /// Keep whitespace-only text nodes
    pub keep_whitespace: bool,
    /// Drop the doctype node
    pub drop_doctype: bool,
    /// Parse as if scripting were enabled (affects `<noscript>`)
    pub scripting_enabled: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::Document,
            base_url: None,
            keep_whitespace: true,
            drop_doctype: false,
            scripting_enabled: true,
        }
    }
}

impl ParserConfig {
    /// Create a new parser config
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for fragment parsing
    pub fn fragment() -> Self {
        Self::default().mode(ParseMode::Fragment)
    }

    /// Set parse mode
    pub fn mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set base URL
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set base URL from a string
    pub fn base_url_str(self, url: &str) -> Result<Self> {
        Ok(self.base_url(Url::parse(url)?))
    }

    /// Keep or drop whitespace-only text
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Drop the doctype node
    pub fn drop_doctype(mut self, drop: bool) -> Self {
        self.drop_doctype = drop;
        self
    }

    /// Enable/disable scripting during tree construction
    pub fn scripting_enabled(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Apply `STRICT_SOUP_MODE` and `STRICT_SOUP_BASE_URL` on top of this config
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(mode) = env::var(ENV_MODE) {
            self.mode = ParseMode::from_name(&mode)
                .ok_or_else(|| Error::config(format!("{ENV_MODE}: unknown mode '{mode}'")))?;
        }
        if let Ok(url) = env::var(ENV_BASE_URL) {
            let url = Url::parse(&url)
                .map_err(|e| Error::config(format!("{ENV_BASE_URL}: {e}")))?;
            self.base_url = Some(url);
        }
        Ok(self)
    }
}

/// Default config with environment overrides applied
pub fn parser_config_from_env() -> Result<ParserConfig> {
    ParserConfig::default().with_env()
}
