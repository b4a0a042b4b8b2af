// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ordered selection results

use std::fmt;
use std::ops::Deref;

use crate::tag::StrictTag;

/// Matches of one selector, in document order
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    source: String,
    tags: Vec<StrictTag>,
}

impl ResultSet {
    pub(crate) fn new(source: impl Into<String>, tags: Vec<StrictTag>) -> Self {
        Self {
            source: source.into(),
            tags,
        }
    }

    /// The selector that produced this set
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consume the set, keeping the tags
    pub fn into_vec(self) -> Vec<StrictTag> {
        self.tags
    }

    /// Outer HTML of every match
    pub fn outer_html(&self) -> Vec<String> {
        self.tags.iter().map(StrictTag::outer_html).collect()
    }

    /// Text of every match
    pub fn texts(&self) -> Vec<String> {
        self.tags.iter().map(StrictTag::text).collect()
    }
}

impl Deref for ResultSet {
    type Target = [StrictTag];

    fn deref(&self) -> &Self::Target {
        &self.tags
    }
}

impl IntoIterator for ResultSet {
    type Item = StrictTag;
    type IntoIter = std::vec::IntoIter<StrictTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a StrictTag;
    type IntoIter = std::slice::Iter<'a, StrictTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use crate::StrictSoup;

    #[test]
    fn test_display_and_access() {
        let soup = StrictSoup::parse("<i>a</i><i>b</i>").unwrap();
        let set = soup.select("i").unwrap();

        assert_eq!(set.source(), "i");
        assert_eq!(set.to_string(), "[<i>a</i>, <i>b</i>]");
        assert_eq!(set.len(), 2);
        assert_eq!(set[1].text(), "b");
        assert_eq!(set.first().map(|t| t.text()).as_deref(), Some("a"));
        assert_eq!(set.texts(), vec!["a", "b"]);
        assert_eq!(set.outer_html(), vec!["<i>a</i>", "<i>b</i>"]);

        let names: Vec<_> = (&set).into_iter().filter_map(|t| t.name()).collect();
        assert_eq!(names, vec!["i", "i"]);
        assert_eq!(set.into_vec().len(), 2);
    }

    #[test]
    fn test_empty_display() {
        let soup = StrictSoup::parse("<p></p>").unwrap();
        let set = soup.select("table").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "[]");
    }
}
