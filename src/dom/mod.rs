// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM engine for HTML parsing and selection
//!
//! Provides an owned node tree built from html5ever output, plus the CSS
//! selector engine that queries it.

mod document;
mod node;
mod parser;
mod selector;

pub use document::Document;
pub use node::{Node, NodeId, NodeType};
pub use parser::{parse_html, parse_html_with_config};
pub use selector::{
    AttributeOperator, AttributeSelector, Combinator, NthExpr, PseudoClass, Selector,
    SelectorPart,
};
