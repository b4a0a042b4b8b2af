// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM Node types

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared node storage for one document
pub(crate) type NodeStore = Arc<RwLock<HashMap<NodeId, NodeData>>>;

/// Elements serialised without children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text is emitted verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new unique node ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Document node
    Document,
    /// Element node (like <div>, <p>, etc.)
    Element,
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// Document type node (<!DOCTYPE>)
    DocumentType,
}

/// Internal node data
#[derive(Debug)]
pub struct NodeData {
    /// Node type
    pub node_type: NodeType,
    /// Tag name for elements, doctype name for doctypes
    pub name: Option<String>,
    /// Text content (for text/comment nodes)
    pub text: Option<String>,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    /// Parent node ID
    pub parent: Option<NodeId>,
    /// Child node IDs
    pub children: Vec<NodeId>,
    /// Previous sibling ID
    pub prev_sibling: Option<NodeId>,
    /// Next sibling ID
    pub next_sibling: Option<NodeId>,
}

impl NodeData {
    fn blank(node_type: NodeType) -> Self {
        Self {
            node_type,
            name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
        }
    }

    /// Create a new element node data
    pub fn element(name: impl Into<String>) -> Self {
        let mut data = Self::blank(NodeType::Element);
        data.name = Some(name.into().to_lowercase());
        data
    }

    /// Create a new text node data
    pub fn text(content: impl Into<String>) -> Self {
        let mut data = Self::blank(NodeType::Text);
        data.text = Some(content.into());
        data
    }

    /// Create a new comment node data
    pub fn comment(content: impl Into<String>) -> Self {
        let mut data = Self::blank(NodeType::Comment);
        data.text = Some(content.into());
        data
    }

    /// Create a new doctype node data
    pub fn doctype(name: impl Into<String>) -> Self {
        let mut data = Self::blank(NodeType::DocumentType);
        data.name = Some(name.into());
        data
    }

    /// Create a new document node data
    pub fn document() -> Self {
        Self::blank(NodeType::Document)
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }
}

/// Link `child` as the last child of `parent`
pub(crate) fn append_child_id(
    nodes: &mut HashMap<NodeId, NodeData>,
    parent_id: NodeId,
    child_id: NodeId,
) {
    let last_child_id = nodes.get(&parent_id).and_then(|p| p.children.last().copied());

    if let Some(last_id) = last_child_id {
        if let Some(last) = nodes.get_mut(&last_id) {
            last.next_sibling = Some(child_id);
        }
    }

    if let Some(child) = nodes.get_mut(&child_id) {
        child.parent = Some(parent_id);
        child.prev_sibling = last_child_id;
        child.next_sibling = None;
    }

    if let Some(parent) = nodes.get_mut(&parent_id) {
        parent.children.push(child_id);
    }
}

/// A reference to a node in the DOM tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Node ID
    pub id: NodeId,
    /// Reference to document's node storage
    nodes: NodeStore,
}

impl Node {
    /// Create a new node reference
    pub(crate) fn new(id: NodeId, nodes: NodeStore) -> Self {
        Self { id, nodes }
    }

    fn handle(&self, id: NodeId) -> Node {
        Node::new(id, self.nodes.clone())
    }

    fn with_data<R>(&self, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.nodes.read().get(&self.id).map(f)
    }

    /// Get the node type
    pub fn node_type(&self) -> NodeType {
        self.with_data(|n| n.node_type)
            .unwrap_or(NodeType::Element)
    }

    /// Get the lowercase tag name (elements) or doctype name
    pub fn name(&self) -> Option<String> {
        self.with_data(|n| n.name.clone()).flatten()
    }

    /// Own text of a text or comment node
    pub fn text(&self) -> Option<String> {
        self.with_data(|n| n.text.clone()).flatten()
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// Check if this is the document node
    pub fn is_document(&self) -> bool {
        self.node_type() == NodeType::Document
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let nodes = self.nodes.read();
        let mut out = String::new();
        collect_text(&nodes, self.id, &mut out);
        out
    }

    /// Replace all children with a single text node
    pub fn set_text_content(&self, content: impl Into<String>) {
        let content = content.into();
        let mut nodes = self.nodes.write();

        let Some(node) = nodes.get_mut(&self.id) else {
            return;
        };
        if node.node_type == NodeType::Text {
            node.text = Some(content);
            return;
        }

        let old_children = std::mem::take(&mut node.children);
        for child in old_children {
            remove_subtree(&mut nodes, child);
        }

        let text_id = NodeId::new();
        nodes.insert(text_id, NodeData::text(content));
        append_child_id(&mut nodes, self.id, text_id);
    }

    /// Insert a text node directly before or after this node
    pub fn insert_text_sibling(&self, content: impl Into<String>, before: bool) -> bool {
        let mut nodes = self.nodes.write();

        let Some(parent_id) = nodes.get(&self.id).and_then(|n| n.parent) else {
            return false;
        };
        let Some(pos) = nodes
            .get(&parent_id)
            .and_then(|p| p.children.iter().position(|&c| c == self.id))
        else {
            return false;
        };

        let text_id = NodeId::new();
        let mut data = NodeData::text(content);
        data.parent = Some(parent_id);
        nodes.insert(text_id, data);

        let insert_at = if before { pos } else { pos + 1 };
        if let Some(parent) = nodes.get_mut(&parent_id) {
            parent.children.insert(insert_at, text_id);
        }
        relink_children(&mut nodes, parent_id);
        true
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.with_data(|n| n.attribute(name).map(String::from))
            .flatten()
    }

    /// Set an attribute value, keeping its position if it already exists
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        if let Some(node) = self.nodes.write().get_mut(&self.id) {
            match node.attributes.iter_mut().find(|(k, _)| *k == name) {
                Some((_, v)) => *v = value,
                None => node.attributes.push((name, value)),
            }
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let mut nodes = self.nodes.write();
        let node = nodes.get_mut(&self.id)?;
        let pos = node
            .attributes
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(node.attributes.remove(pos).1)
    }

    /// Check if has an attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.with_data(|n| n.attribute(name).is_some())
            .unwrap_or(false)
    }

    /// Get all attributes in source order
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.with_data(|n| n.attributes.clone())
            .unwrap_or_default()
    }

    /// Get parent node
    pub fn parent(&self) -> Option<Node> {
        self.with_data(|n| n.parent)
            .flatten()
            .map(|id| self.handle(id))
    }

    /// Get parent, only if it is an element
    pub fn parent_element(&self) -> Option<Node> {
        self.parent().filter(Node::is_element)
    }

    /// Get child nodes
    pub fn children(&self) -> Vec<Node> {
        self.with_data(|n| n.children.iter().map(|&id| self.handle(id)).collect())
            .unwrap_or_default()
    }

    /// Get child elements
    pub fn element_children(&self) -> Vec<Node> {
        let nodes = self.nodes.read();
        nodes
            .get(&self.id)
            .map(|n| {
                n.children
                    .iter()
                    .filter(|&id| nodes.get(id).is_some_and(NodeData::is_element))
                    .map(|&id| self.handle(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get next sibling
    pub fn next_sibling(&self) -> Option<Node> {
        self.with_data(|n| n.next_sibling)
            .flatten()
            .map(|id| self.handle(id))
    }

    /// Get previous sibling
    pub fn prev_sibling(&self) -> Option<Node> {
        self.with_data(|n| n.prev_sibling)
            .flatten()
            .map(|id| self.handle(id))
    }

    /// Get next sibling element
    pub fn next_element_sibling(&self) -> Option<Node> {
        let mut sibling = self.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(s);
            }
            sibling = s.next_sibling();
        }
        None
    }

    /// Get previous sibling element
    pub fn prev_element_sibling(&self) -> Option<Node> {
        let mut sibling = self.prev_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(s);
            }
            sibling = s.prev_sibling();
        }
        None
    }

    /// Element descendants in document order, excluding self
    pub fn descendant_elements(&self) -> Vec<Node> {
        let nodes = self.nodes.read();
        let mut results = Vec::new();
        let mut stack: Vec<NodeId> = nodes
            .get(&self.id)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(id) = stack.pop() {
            if let Some(data) = nodes.get(&id) {
                if data.is_element() {
                    results.push(self.handle(id));
                }
                stack.extend(data.children.iter().rev().copied());
            }
        }

        results
    }

    /// Check if `self` is a strict ancestor of `other`
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = other.parent();
        while let Some(parent) = current {
            if parent.id == self.id {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    /// Get inner HTML
    pub fn inner_html(&self) -> String {
        let nodes = self.nodes.read();
        let mut out = String::new();
        if let Some(node) = nodes.get(&self.id) {
            let raw = is_raw_text(node);
            for &id in &node.children {
                serialize_node(&nodes, id, raw, &mut out);
            }
        }
        out
    }

    /// Get outer HTML
    pub fn outer_html(&self) -> String {
        let nodes = self.nodes.read();
        let raw = nodes
            .get(&self.id)
            .and_then(|n| n.parent)
            .and_then(|p| nodes.get(&p))
            .is_some_and(is_raw_text);
        let mut out = String::new();
        serialize_node(&nodes, self.id, raw, &mut out);
        out
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn collect_text(nodes: &HashMap<NodeId, NodeData>, node_id: NodeId, out: &mut String) {
    let mut stack = vec![node_id];
    while let Some(id) = stack.pop() {
        let Some(node) = nodes.get(&id) else {
            continue;
        };
        match node.node_type {
            NodeType::Text => out.push_str(node.text.as_deref().unwrap_or("")),
            NodeType::Element | NodeType::Document => {
                stack.extend(node.children.iter().rev().copied());
            }
            NodeType::Comment | NodeType::DocumentType => {}
        }
    }
}

fn remove_subtree(nodes: &mut HashMap<NodeId, NodeData>, node_id: NodeId) {
    let mut stack = vec![node_id];
    while let Some(id) = stack.pop() {
        if let Some(data) = nodes.remove(&id) {
            stack.extend(data.children);
        }
    }
}

/// Recompute sibling links after the child list was edited in place
fn relink_children(nodes: &mut HashMap<NodeId, NodeData>, parent_id: NodeId) {
    let children = nodes
        .get(&parent_id)
        .map(|p| p.children.clone())
        .unwrap_or_default();
    for (i, &id) in children.iter().enumerate() {
        if let Some(child) = nodes.get_mut(&id) {
            child.prev_sibling = i.checked_sub(1).map(|j| children[j]);
            child.next_sibling = children.get(i + 1).copied();
        }
    }
}

fn is_raw_text(node: &NodeData) -> bool {
    node.is_element()
        && node
            .name
            .as_deref()
            .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n))
}

/// Pending serializer work
enum Step {
    Open(NodeId, bool),
    Close(NodeId),
}

/// Serialize a node to HTML
fn serialize_node(nodes: &HashMap<NodeId, NodeData>, node_id: NodeId, raw: bool, out: &mut String) {
    let mut stack = vec![Step::Open(node_id, raw)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id, raw) => open_node(nodes, id, raw, &mut stack, out),
            Step::Close(id) => {
                let tag = nodes.get(&id).and_then(|n| n.name.as_deref()).unwrap_or("div");
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Write the start of a node and queue its children and end tag
fn open_node(
    nodes: &HashMap<NodeId, NodeData>,
    node_id: NodeId,
    raw: bool,
    stack: &mut Vec<Step>,
    out: &mut String,
) {
    let Some(node) = nodes.get(&node_id) else {
        return;
    };
    match node.node_type {
        NodeType::Text => {
            let text = node.text.as_deref().unwrap_or("");
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(node.text.as_deref().unwrap_or(""));
            out.push_str("-->");
        }
        NodeType::DocumentType => {
            out.push_str("<!DOCTYPE ");
            out.push_str(node.name.as_deref().unwrap_or("html"));
            out.push('>');
        }
        NodeType::Document => {
            stack.extend(node.children.iter().rev().map(|&c| Step::Open(c, false)));
        }
        NodeType::Element => {
            let tag = node.name.as_deref().unwrap_or("div");
            out.push('<');
            out.push_str(tag);
            for (k, v) in &node.attributes {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape_attribute(v));
                out.push('"');
            }

            if VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>");
                return;
            }

            out.push('>');
            let raw = is_raw_text(node);
            stack.push(Step::Close(node_id));
            stack.extend(node.children.iter().rev().map(|&c| Step::Open(c, raw)));
        }
    }
}

/// Escape text content
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for a double-quoted context
fn escape_attribute(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
