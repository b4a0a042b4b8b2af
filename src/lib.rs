// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # strict_soup - Parsed HTML, a little bit easier
//!
//! HTML parsing (html5ever) plus CSS selection with *strict* variants that
//! fail loudly when the document does not have the expected shape.
//!
//! ## Features
//!
//! - `select` / `select_one`: regular CSS selection
//! - `strict_select`: error when nothing matches
//! - `strict_select_one`: error unless exactly one element matches
//! - `strict_get`: error when an attribute is missing
//! - `strict_url`: attribute resolved against the document base URL
//! - Document or fragment parsing, file and reader input
//!
//! ## Example
//!
//! ```rust
//! use strict_soup::StrictSoup;
//!
//! # fn main() -> strict_soup::Result<()> {
//! let soup = StrictSoup::parse(r#"<h1 value="123"><b>Title</b></h1><h2>a</h2><h2>b</h2>"#)?;
//!
//! let h1 = soup.strict_select_one("h1")?;
//! assert_eq!(h1.strict_get("value")?, "123");
//! assert_eq!(soup.strict_select("h2")?.len(), 2);
//!
//! // Two <h2> elements: not exactly one
//! assert!(soup.strict_select_one("h2").is_err());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod result_set;
pub mod soup;
pub mod tag;

// Re-exports for convenience

// Parsing
pub use config::{parser_config_from_env, ParseMode, ParserConfig};
pub use soup::StrictSoup;

// Selection
pub use dom::Selector;
pub use result_set::ResultSet;
pub use tag::StrictTag;

// Errors
pub use error::{Error, ErrorContext, Result};

/// strict_soup version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
