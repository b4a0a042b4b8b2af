// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The parsed document

use std::fmt;
use std::fs;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::config::ParserConfig;
use crate::dom::{parse_html_with_config, Document};
use crate::error::{Error, Result};
use crate::tag::StrictTag;

/// A parsed HTML document with strict selection helpers
///
/// Dereferences to the root [`StrictTag`], so `soup.strict_select(..)` searches
/// the whole document.
#[derive(Debug, Clone)]
pub struct StrictSoup {
    document: Document,
    root: StrictTag,
    config: ParserConfig,
}

impl StrictSoup {
    /// Parse markup with the default config
    pub fn parse(markup: &str) -> Result<Self> {
        Self::with_config(markup, ParserConfig::default())
    }

    /// Parse markup with an explicit config
    pub fn with_config(markup: &str, config: ParserConfig) -> Result<Self> {
        Self::from_bytes(markup.as_bytes(), config)
    }

    /// Parse UTF-8 bytes; invalid sequences are replaced
    pub fn from_bytes(markup: &[u8], config: ParserConfig) -> Result<Self> {
        let document = parse_html_with_config(markup, &config)?;
        let base_url = document.base_url.clone().map(Arc::new);
        let root = StrictTag::new(document.root(), base_url);
        Ok(Self {
            document,
            root,
            config,
        })
    }

    /// Read everything from `reader` and parse it
    pub fn from_reader<R: Read>(mut reader: R, config: ParserConfig) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::from_bytes(&buf, config)
    }

    /// Parse a file from disk
    pub fn from_file(path: impl AsRef<Path>, config: ParserConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading html file");
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, config)
    }

    /// The root of the tree
    pub fn root(&self) -> &StrictTag {
        &self.root
    }

    /// The underlying document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The config this soup was parsed with
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Base URL used by [`StrictTag::strict_url`]
    pub fn base_url(&self) -> Option<&Url> {
        self.document.base_url.as_ref()
    }

    /// Text of the first `<title>`
    pub fn title(&self) -> Option<String> {
        self.document.title()
    }

    /// Always fails: the document root has no siblings
    pub fn insert_before(&self, text: impl Into<String>) -> Result<()> {
        Err(Error::unsupported(format!(
            "insert_before on the document root, {:?} was not inserted",
            text.into()
        )))
    }

    /// Always fails: the document root has no siblings
    pub fn insert_after(&self, text: impl Into<String>) -> Result<()> {
        Err(Error::unsupported(format!(
            "insert_after on the document root, {:?} was not inserted",
            text.into()
        )))
    }
}

impl Deref for StrictSoup {
    type Target = StrictTag;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl fmt::Display for StrictSoup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.document.outer_html())
    }
}

impl std::str::FromStr for StrictSoup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StrictSoup::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const MARKUP: &str = r#"<h1 value="123"><text>H1 Test</text></h1><h2><text>H2 Test 1</text></h2><h2>H2 Text 2</h2>"#;

    #[test]
    fn test_fragment_round_trip() {
        let soup = StrictSoup::with_config(MARKUP, ParserConfig::fragment()).unwrap();
        assert_eq!(soup.to_string(), MARKUP);
        assert!(soup.root().name().is_none());
    }

    #[test]
    fn test_document_mode_display() {
        let soup: StrictSoup = "<title>T</title><p>x</p>".parse().unwrap();
        assert_eq!(
            soup.to_string(),
            "<html><head><title>T</title></head><body><p>x</p></body></html>"
        );
        assert_eq!(soup.title().as_deref(), Some("T"));
    }

    #[test]
    fn test_deeply_nested_markup() {
        let depth = 20_000;
        let markup = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let soup = StrictSoup::with_config(&markup, ParserConfig::fragment()).unwrap();

        assert_eq!(soup.strict_select("div").unwrap().len(), depth);
        assert_eq!(soup.text(), "x");
        assert_eq!(soup.to_string(), markup);

        let outer = soup.strict_select("div").unwrap()[0].clone();
        outer.set_string("y");
        assert_eq!(soup.to_string(), "<div>y</div>");
    }

    #[test]
    fn test_root_insertion_unsupported() {
        let soup = StrictSoup::parse(MARKUP).unwrap();
        let before = soup.insert_before("x").unwrap_err();
        let after = soup.insert_after("x").unwrap_err();
        assert!(matches!(before, Error::Unsupported(_)));
        assert!(matches!(after, Error::Unsupported(_)));
        assert!(!before.is_strict_select());

        // Elements inside the soup still accept siblings
        let h1 = soup.strict_select_one("h1").unwrap();
        h1.insert_after("!").unwrap();
        assert!(soup.to_string().contains("</h1>!<h2>"));
    }

    #[test]
    fn test_from_reader() {
        let soup =
            StrictSoup::from_reader(MARKUP.as_bytes(), ParserConfig::fragment()).unwrap();
        assert_eq!(soup.strict_select("h2").unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = StrictSoup::from_file("/definitely/not/here.html", ParserConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_base_url() {
        let config = ParserConfig::new().base_url_str("https://example.com/").unwrap();
        let soup = StrictSoup::with_config(r#"<a href="a/b">x</a>"#, config).unwrap();
        assert_eq!(soup.base_url().map(Url::as_str), Some("https://example.com/"));
        assert_eq!(soup.document().base_url.as_ref(), soup.base_url());
        assert_eq!(
            soup.strict_select_one("a").unwrap().strict_url("href").unwrap().as_str(),
            "https://example.com/a/b"
        );
        assert!(StrictSoup::parse("<p>x</p>").unwrap().base_url().is_none());
    }

    #[test]
    fn test_plain_dom_has_no_strict_api() {
        // Strictness lives on StrictTag; the bare node only reports what exists
        let doc = parse_html("<h2>x</h2>").unwrap();
        let root = doc.root();
        let missing = crate::dom::Selector::parse("h3").unwrap().select(&root, None);
        assert!(missing.is_empty());
        assert_eq!(doc.node_count(), StrictSoup::parse("<h2>x</h2>").unwrap().document().node_count());
    }
}
