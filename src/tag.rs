// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element handle with strict selection helpers

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};
use url::Url;

use crate::dom::{Node, Selector};
use crate::error::{Error, Result};
use crate::result_set::ResultSet;

/// An element (or the document root) in a parsed tree
///
/// `select*` returns `Ok(empty)` / `Ok(None)` when nothing matches; the
/// `strict_*` variants turn that into an error instead.
#[derive(Debug, Clone)]
pub struct StrictTag {
    node: Node,
    base_url: Option<Arc<Url>>,
}

impl StrictTag {
    pub(crate) fn new(node: Node, base_url: Option<Arc<Url>>) -> Self {
        Self { node, base_url }
    }

    fn wrap(&self, node: Node) -> StrictTag {
        StrictTag::new(node, self.base_url.clone())
    }

    /// Underlying DOM node
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Tag name in lowercase (`None` for the document root)
    pub fn name(&self) -> Option<String> {
        if self.node.is_element() {
            self.node.name()
        } else {
            None
        }
    }

    /// Perform a CSS selection on the descendants of this element
    pub fn select(&self, selector: &str) -> Result<ResultSet> {
        self.select_inner(selector, None)
    }

    /// Like [`select`](Self::select), stopping after `limit` results
    pub fn select_limit(&self, selector: &str, limit: usize) -> Result<ResultSet> {
        self.select_inner(selector, Some(limit))
    }

    fn select_inner(&self, selector: &str, limit: Option<usize>) -> Result<ResultSet> {
        let parsed = Selector::parse(selector)?;
        let tags: Vec<StrictTag> = parsed
            .select(&self.node, limit)
            .into_iter()
            .map(|n| self.wrap(n))
            .collect();
        trace!(selector, matches = tags.len(), "select");
        Ok(ResultSet::new(parsed.source(), tags))
    }

    /// First match, or `None`
    pub fn select_one(&self, selector: &str) -> Result<Option<StrictTag>> {
        let parsed = Selector::parse(selector)?;
        Ok(parsed.select_first(&self.node).map(|n| self.wrap(n)))
    }

    /// Select that fails when there are no matches
    ///
    /// # Errors
    ///
    /// [`Error::NoMatches`] for an empty result, [`Error::Selector`] for an
    /// invalid selector.
    pub fn strict_select(&self, selector: &str) -> Result<ResultSet> {
        self.strict_select_inner(selector, None)
    }

    /// Like [`strict_select`](Self::strict_select), stopping after `limit` results
    pub fn strict_select_limit(&self, selector: &str, limit: usize) -> Result<ResultSet> {
        self.strict_select_inner(selector, Some(limit))
    }

    fn strict_select_inner(&self, selector: &str, limit: Option<usize>) -> Result<ResultSet> {
        let output = self.select_inner(selector, limit)?;
        if output.is_empty() {
            debug!(selector, "strict_select found no matches");
            return Err(Error::no_matches(selector));
        }
        Ok(output)
    }

    /// Select that fails unless there is exactly one match
    ///
    /// # Errors
    ///
    /// [`Error::NoMatches`] when nothing matches and
    /// [`Error::WrongMatchCount`] when more than one element does.
    pub fn strict_select_one(&self, selector: &str) -> Result<StrictTag> {
        self.strict_select_one_inner(selector, None)
    }

    /// Like [`strict_select_one`](Self::strict_select_one), counting at most `limit` matches
    ///
    /// With `limit` 1 the first match wins instead of failing on duplicates.
    pub fn strict_select_one_limit(&self, selector: &str, limit: usize) -> Result<StrictTag> {
        self.strict_select_one_inner(selector, Some(limit))
    }

    fn strict_select_one_inner(&self, selector: &str, limit: Option<usize>) -> Result<StrictTag> {
        let output = self.strict_select_inner(selector, limit)?;
        if output.len() != 1 {
            debug!(selector, matches = output.len(), "strict_select_one found several matches");
            return Err(Error::wrong_match_count(selector, output.len()));
        }
        output
            .into_iter()
            .next()
            .ok_or_else(|| Error::no_matches(selector))
    }

    /// Attribute value, if present
    pub fn get(&self, key: &str) -> Option<String> {
        self.node.get_attribute(key)
    }

    /// Attribute value split on whitespace
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)
            .map(|v| v.split_whitespace().map(String::from).collect())
    }

    /// Attribute value that must be present
    pub fn strict_get(&self, key: &str) -> Result<String> {
        self.get(key).ok_or_else(|| {
            debug!(key, "strict_get found no attribute");
            Error::missing_attribute(key)
        })
    }

    /// Whitespace-separated attribute that must be present
    pub fn strict_get_list(&self, key: &str) -> Result<Vec<String>> {
        self.get_list(key)
            .ok_or_else(|| Error::missing_attribute(key))
    }

    /// URL-valued attribute resolved against the document base URL
    ///
    /// Without a base URL the value must already be absolute.
    pub fn strict_url(&self, key: &str) -> Result<Url> {
        let value = self.strict_get(key)?;
        let url = match self.base_url.as_deref() {
            Some(base) => base.join(value.trim())?,
            None => Url::parse(value.trim())?,
        };
        Ok(url)
    }

    /// Check if attribute is present
    pub fn has_attr(&self, key: &str) -> bool {
        self.node.has_attribute(key)
    }

    /// All attributes in source order
    pub fn attrs(&self) -> Vec<(String, String)> {
        self.node.attributes()
    }

    /// Set an attribute
    pub fn set_attr(&self, key: impl Into<String>, value: impl Into<String>) {
        self.node.set_attribute(key, value);
    }

    /// Remove an attribute, returning the old value
    pub fn remove_attr(&self, key: &str) -> Option<String> {
        self.node.remove_attribute(key)
    }

    /// Concatenated text of all descendants
    pub fn text(&self) -> String {
        self.node.text_content()
    }

    /// Text with whitespace runs collapsed and ends trimmed
    pub fn stripped_text(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Replace the children with a single text node
    pub fn set_string(&self, text: impl Into<String>) {
        self.node.set_text_content(text);
    }

    /// Insert text immediately before this element
    pub fn insert_before(&self, text: impl Into<String>) -> Result<()> {
        if self.node.insert_text_sibling(text, true) {
            Ok(())
        } else {
            Err(Error::unsupported("insert_before on a detached element"))
        }
    }

    /// Insert text immediately after this element
    pub fn insert_after(&self, text: impl Into<String>) -> Result<()> {
        if self.node.insert_text_sibling(text, false) {
            Ok(())
        } else {
            Err(Error::unsupported("insert_after on a detached element"))
        }
    }

    /// Markup of the children
    pub fn inner_html(&self) -> String {
        self.node.inner_html()
    }

    /// Markup of this element including its own tag
    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }

    /// Child elements
    pub fn children(&self) -> Vec<StrictTag> {
        self.node
            .element_children()
            .into_iter()
            .map(|n| self.wrap(n))
            .collect()
    }

    /// Parent element
    pub fn parent(&self) -> Option<StrictTag> {
        self.node.parent_element().map(|n| self.wrap(n))
    }

    /// Next sibling element
    pub fn next_sibling(&self) -> Option<StrictTag> {
        self.node.next_element_sibling().map(|n| self.wrap(n))
    }

    /// Previous sibling element
    pub fn prev_sibling(&self) -> Option<StrictTag> {
        self.node.prev_element_sibling().map(|n| self.wrap(n))
    }

    /// Check if this element matches a selector
    pub fn matches(&self, selector: &str) -> Result<bool> {
        Ok(Selector::parse(selector)?.matches(&self.node))
    }

    /// Closest ancestor matching selector
    pub fn find_parent(&self, selector: &str) -> Result<Option<StrictTag>> {
        let sel = Selector::parse(selector)?;

        let mut current = self.node.parent_element();
        while let Some(parent) = current {
            if sel.matches(&parent) {
                return Ok(Some(self.wrap(parent)));
            }
            current = parent.parent_element();
        }

        Ok(None)
    }
}

impl fmt::Display for StrictTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.outer_html())
    }
}

impl PartialEq for StrictTag {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for StrictTag {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StrictSoup;

    const PARSED_HTML: &str = r#"<h1 value="123"><text>H1 Test</text></h1>
    <h2><text>H2 Test 1</text></h2><h2>H2 Text 2</h2>"#;

    fn soup() -> StrictSoup {
        StrictSoup::parse(PARSED_HTML).unwrap()
    }

    #[test]
    fn test_strict_select_multiple_matches() {
        let result = soup().strict_select("h2").unwrap();
        assert_eq!(
            result.to_string(),
            "[<h2><text>H2 Test 1</text></h2>, <h2>H2 Text 2</h2>]"
        );
    }

    #[test]
    fn test_strict_select_single_match() {
        let result = soup().strict_select("h1").unwrap();
        assert_eq!(result.to_string(), r#"[<h1 value="123"><text>H1 Test</text></h1>]"#);
    }

    #[test]
    fn test_strict_select_no_matches() {
        let err = soup().strict_select("h3").unwrap_err();
        assert!(err.is_strict_select());
        assert_eq!(err.to_string(), "No matches found for strict_select(h3)");
    }

    #[test]
    fn test_strict_select_child_matches() {
        let result = soup().strict_select("h2").unwrap()[0].strict_select("text").unwrap();
        assert_eq!(result.to_string(), "[<text>H2 Test 1</text>]");
    }

    #[test]
    fn test_strict_select_one() {
        let soup = soup();
        assert_eq!(
            soup.strict_select_one("h1").unwrap().to_string(),
            r#"<h1 value="123"><text>H1 Test</text></h1>"#
        );

        let none = soup.strict_select_one("h3").unwrap_err();
        assert!(matches!(none, Error::NoMatches { .. }));

        let many = soup.strict_select_one("h2").unwrap_err();
        assert!(matches!(many, Error::WrongMatchCount { count: 2, .. }));
        assert_eq!(many.to_string(), "Found 2 matches for strict_select_one(h2)");
    }

    #[test]
    fn test_strict_select_one_child() {
        let result = soup().strict_select("h2").unwrap()[0]
            .strict_select_one("text")
            .unwrap();
        assert_eq!(result.to_string(), "<text>H2 Test 1</text>");
    }

    #[test]
    fn test_strict_select_one_limit() {
        let soup = soup();
        let first = soup.strict_select_one_limit("h2", 1).unwrap();
        assert_eq!(first.text(), "H2 Test 1");

        let many = soup.strict_select_one_limit("h2", 5).unwrap_err();
        assert!(matches!(many, Error::WrongMatchCount { count: 2, .. }));

        let none = soup.strict_select_one_limit("h2", 0).unwrap_err();
        assert!(matches!(none, Error::NoMatches { .. }));
        assert!(soup.strict_select_one_limit("h3", 1).is_err());
    }

    #[test]
    fn test_strict_get() {
        let h1 = soup().strict_select_one("h1").unwrap();
        assert_eq!(h1.strict_get("value").unwrap(), "123");

        let err = h1.strict_get("missing_value").unwrap_err();
        assert!(err.is_strict_select());
        assert!(matches!(err, Error::MissingAttribute { .. }));
    }

    #[test]
    fn test_non_strict_select() {
        let soup = soup();
        assert!(soup.select("h3").unwrap().is_empty());
        assert!(soup.select_one("h3").unwrap().is_none());
        assert_eq!(soup.select_one("h2").unwrap().unwrap().text(), "H2 Test 1");
        assert_eq!(soup.select_limit("h2", 1).unwrap().len(), 1);
        assert!(soup.strict_select_limit("h2", 0).is_err());
    }

    #[test]
    fn test_invalid_selector_is_not_strict_error() {
        let err = soup().strict_select("h1[").unwrap_err();
        assert!(err.is_selector());
        assert!(!err.is_strict_select());
    }

    #[test]
    fn test_select_excludes_self() {
        let soup = StrictSoup::parse("<div><div><div></div></div></div>").unwrap();
        let outer = soup.strict_select("body > div").unwrap()[0].clone();
        assert_eq!(outer.select("div").unwrap().len(), 2);
    }

    #[test]
    fn test_attribute_helpers() {
        let soup = StrictSoup::parse(r#"<a class=" nav  main " href="/x">Go</a>"#).unwrap();
        let a = soup.strict_select_one("a").unwrap();

        assert_eq!(a.strict_get("class").unwrap(), " nav  main ");
        assert_eq!(a.strict_get_list("class").unwrap(), vec!["nav", "main"]);
        assert!(a.strict_get_list("rel").is_err());
        assert_eq!(a.name().as_deref(), Some("a"));
        assert!(a.has_attr("href"));
    }

    #[test]
    fn test_strict_url() {
        let config = crate::ParserConfig::new()
            .base_url_str("https://example.com/docs/")
            .unwrap();
        let soup = StrictSoup::with_config(
            r#"<a href="page.html">p</a><img src="https://cdn.example.com/i.png"><a href=" ../up ">u</a>"#,
            config,
        )
        .unwrap();

        let links = soup.strict_select("a").unwrap();
        assert_eq!(
            links[0].strict_url("href").unwrap().as_str(),
            "https://example.com/docs/page.html"
        );
        assert_eq!(links[1].strict_url("href").unwrap().as_str(), "https://example.com/up");
        let img = soup.strict_select_one("img").unwrap();
        assert_eq!(img.strict_url("src").unwrap().host_str(), Some("cdn.example.com"));

        let no_base = StrictSoup::parse(r#"<a href="page.html">p</a>"#).unwrap();
        let err = no_base.strict_select_one("a").unwrap().strict_url("href").unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_navigation() {
        let soup = StrictSoup::parse("<ul id=l><li>a</li><li class=b>b</li><li>c</li></ul>").unwrap();
        let b = soup.strict_select_one(".b").unwrap();

        assert_eq!(b.prev_sibling().unwrap().text(), "a");
        assert_eq!(b.next_sibling().unwrap().text(), "c");
        assert_eq!(b.parent().unwrap().strict_get("id").unwrap(), "l");
        assert_eq!(b.find_parent("body").unwrap().unwrap().name().as_deref(), Some("body"));
        assert!(b.find_parent("table").unwrap().is_none());
        assert!(b.matches("ul > li.b").unwrap());
        assert_eq!(b.parent().unwrap().children().len(), 3);
    }

    #[test]
    fn test_text_helpers() {
        let soup = StrictSoup::parse("<p>  Hello\n   <b>big</b>   world </p>").unwrap();
        let p = soup.strict_select_one("p").unwrap();
        assert_eq!(p.stripped_text(), "Hello big world");
        assert_eq!(p.inner_html(), "  Hello\n   <b>big</b>   world ");
    }

    #[test]
    fn test_mutation() {
        let soup = StrictSoup::parse("<div><span>x</span></div>").unwrap();
        let span = soup.strict_select_one("span").unwrap();

        span.set_attr("data-id", "7");
        span.set_string("y & z");
        span.insert_before("<").unwrap();
        span.insert_after(">").unwrap();
        assert_eq!(
            soup.strict_select_one("div").unwrap().inner_html(),
            r#"&lt;<span data-id="7">y &amp; z</span>&gt;"#
        );

        assert_eq!(span.remove_attr("data-id").as_deref(), Some("7"));
        assert!(span.strict_get("data-id").is_err());
    }
}
