// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, parse_document, parse_fragment};
use html5ever::{ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tracing::debug;

use super::document::Document;
use super::node::{append_child_id, NodeData, NodeId};
use crate::config::{ParseMode, ParserConfig};
use crate::error::{Error, Result};

/// Parse HTML string into a Document with the default config
pub fn parse_html(html: &str) -> Result<Document> {
    parse_html_with_config(html.as_bytes(), &ParserConfig::default())
}

/// Parse UTF-8 bytes into a Document
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn parse_html_with_config(mut html: &[u8], config: &ParserConfig) -> Result<Document> {
    let len = html.len();
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: config.drop_doctype,
            scripting_enabled: config.scripting_enabled,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = match config.mode {
        ParseMode::Document => parse_document(RcDom::default(), opts)
            .from_utf8()
            .read_from(&mut html),
        ParseMode::Fragment => {
            let context = QualName::new(None, ns!(html), local_name!("body"));
            parse_fragment(RcDom::default(), opts, context, Vec::new())
                .from_utf8()
                .read_from(&mut html)
        }
    }
    .map_err(|e| Error::HtmlParse(e.to_string()))?;

    let mut doc = Document::new();
    doc.base_url = config.base_url.clone();

    let mut converter = DomConverter::new(&doc, config.keep_whitespace);
    let root_id = doc.root().id;
    match config.mode {
        ParseMode::Document => converter.convert_children(&dom.document, root_id),
        ParseMode::Fragment => {
            // The fragment parser hangs everything off a synthetic <html> element
            for child in dom.document.children.borrow().iter() {
                if matches!(child.data, RcNodeData::Element { .. }) {
                    converter.convert_children(child, root_id);
                } else {
                    converter.convert_subtree(child, root_id);
                }
            }
        }
    }

    debug!(
        mode = ?config.mode,
        nodes = converter.count,
        bytes = len,
        "parsed html"
    );

    Ok(doc)
}

/// Converts the html5ever tree into our node storage
struct DomConverter<'a> {
    doc: &'a Document,
    keep_whitespace: bool,
    count: usize,
}

impl<'a> DomConverter<'a> {
    fn new(doc: &'a Document, keep_whitespace: bool) -> Self {
        Self {
            doc,
            keep_whitespace,
            count: 0,
        }
    }

    fn convert_children(&mut self, handle: &Handle, parent_id: NodeId) {
        let mut stack = Vec::new();
        push_children(&mut stack, handle, parent_id);
        self.drain(stack);
    }

    fn convert_subtree(&mut self, handle: &Handle, parent_id: NodeId) {
        self.drain(vec![(handle.clone(), parent_id)]);
    }

    /// Convert pending nodes depth-first, children in source order
    fn drain(&mut self, mut stack: Vec<(Handle, NodeId)>) {
        while let Some((handle, parent_id)) = stack.pop() {
            let Some(node_id) = self.convert_node(&handle, parent_id) else {
                continue;
            };
            push_children(&mut stack, &handle, node_id);

            // <template> keeps its children in a separate fragment
            if let RcNodeData::Element {
                ref template_contents,
                ..
            } = handle.data
            {
                if let Some(contents) = template_contents.borrow().as_ref() {
                    push_children(&mut stack, contents, node_id);
                }
            }
        }
    }

    /// Insert one node under `parent_id`, returning its id unless skipped
    fn convert_node(&mut self, handle: &Handle, parent_id: NodeId) -> Option<NodeId> {
        let data = match handle.data {
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return None,
            RcNodeData::Doctype { ref name, .. } => NodeData::doctype(name.to_string()),
            RcNodeData::Text { ref contents } => {
                let text = contents.borrow().to_string();
                if !self.keep_whitespace && text.trim().is_empty() {
                    return None;
                }
                NodeData::text(text)
            }
            RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
            RcNodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let mut data = NodeData::element(name.local.to_string());
                for attr in attrs.borrow().iter() {
                    let key = match attr.name.prefix {
                        Some(ref prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    data.attributes.push((key, attr.value.to_string()));
                }
                data
            }
        };

        let node_id = NodeId::new();
        {
            let mut nodes = self.doc.nodes.write();
            nodes.insert(node_id, data);
            append_child_id(&mut nodes, parent_id, node_id);
        }
        self.count += 1;
        Some(node_id)
    }
}

/// Queue the children of `handle` so the first child is popped first
fn push_children(stack: &mut Vec<(Handle, NodeId)>, handle: &Handle, parent_id: NodeId) {
    stack.extend(
        handle
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), parent_id)),
    );
}
