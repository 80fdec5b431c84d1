//! Tree snapshot - a normalized, serializable copy of a parse tree
//!
//! Serializers consume a [`TreeSnapshot`] instead of walking the arena themselves.

use crate::bbcode::style::Style;
use crate::bbcode::tree::{NodeId, NodeKind, Tree};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    /// Node kind name (`root`, `text`, `b`, `quote`, ...).
    pub node_type: String,
    /// Text of a text node, otherwise the tag value if any.
    pub label: String,
    pub attributes: BTreeMap<String, String>,
    /// Byte range of the node in the source.
    pub span: (usize, usize),
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            span: (0, 0),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

pub fn snapshot_from_tree(tree: &Tree) -> TreeSnapshot {
    snapshot_node(tree, tree.root())
}

fn snapshot_node(tree: &Tree, id: NodeId) -> TreeSnapshot {
    let node = tree.node(id);
    let kind = node.kind();
    let mut snapshot = match kind {
        NodeKind::Text(text) => {
            let snapshot = TreeSnapshot::new("text", text.text.as_str());
            if text.styles.is_empty() {
                snapshot
            } else {
                snapshot.with_attribute("styles", style_names(&text.styles))
            }
        }
        NodeKind::Size(level) => TreeSnapshot::new(kind.name(), level.to_string()),
        NodeKind::Color(rgb) => TreeSnapshot::new(kind.name(), rgb.to_string()),
        NodeKind::Align(alignment) => TreeSnapshot::new(kind.name(), alignment.name()),
        NodeKind::Url(value) | NodeKind::Spoiler(value) | NodeKind::Quote(value) => {
            TreeSnapshot::new(kind.name(), value.clone().unwrap_or_default())
        }
        NodeKind::Image { width } => {
            let snapshot = TreeSnapshot::new(kind.name(), "");
            match width {
                Some(width) => snapshot.with_attribute("width", width.to_string()),
                None => snapshot,
            }
        }
        NodeKind::Unknown { tag, value } => TreeSnapshot::new(tag.as_str(), value.clone().unwrap_or_default())
            .with_attribute("passthrough", "true"),
        _ => TreeSnapshot::new(kind.name(), ""),
    };

    let span = node.span();
    snapshot.span = (span.start, span.end);
    snapshot.children = node
        .children()
        .iter()
        .map(|&child| snapshot_node(tree, child))
        .collect();
    snapshot
}

fn style_names(styles: &[Style]) -> String {
    styles
        .iter()
        .map(|style| match style {
            Style::Bold => "bold".to_string(),
            Style::Italic => "italic".to_string(),
            Style::Underline => "underline".to_string(),
            Style::Strikethrough => "strikethrough".to_string(),
            Style::Superscript => "superscript".to_string(),
            Style::Subscript => "subscript".to_string(),
            Style::Size(level) => format!("size({level})"),
            Style::Color(rgb) => format!("color({rgb})"),
            Style::Align(alignment) => format!("align({})", alignment.name()),
            Style::Link(url) => format!("link({url})"),
            Style::Code => "code".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
