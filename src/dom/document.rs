// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::node::{Node, NodeData, NodeId, NodeStore};

/// Parsed HTML document: owns the node storage all handles point into
#[derive(Debug, Clone)]
pub struct Document {
    /// Base URL for resolving relative links
    pub base_url: Option<Url>,
    /// Root node ID
    root_id: NodeId,
    /// Node storage
    pub(crate) nodes: NodeStore,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let root_id = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, NodeData::document());

        Self {
            base_url: None,
            root_id,
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    /// Get the root (document) node
    pub fn root(&self) -> Node {
        Node::new(self.root_id, self.nodes.clone())
    }

    /// Number of nodes in the document, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// First element with the given tag name, in document order
    pub fn first_by_name(&self, name: &str) -> Option<Node> {
        self.root()
            .descendant_elements()
            .into_iter()
            .find(|n| n.name().is_some_and(|t| t.eq_ignore_ascii_case(name)))
    }

    /// Text of the first `<title>` element, if any
    pub fn title(&self) -> Option<String> {
        self.first_by_name("title").map(|t| t.text_content())
    }

    /// Get the document's HTML
    pub fn outer_html(&self) -> String {
        self.root().outer_html()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
