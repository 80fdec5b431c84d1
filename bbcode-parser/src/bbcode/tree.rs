//! Arena-backed parse tree.
//!
//! Every node lives in a single `Vec` owned by the [`Tree`] and is addressed by
//! [`NodeId`]. Parents own their children through index lists; the parent index
//! stored on each node is a back-reference for lookups only. The tree is built
//! once by the [`TreeBuilder`](super::building::TreeBuilder) and is read-only
//! afterwards: a changed input gets a new tree.

use super::registry::PrototypeId;
use super::style::{Alignment, Rgb, StyledText};
use std::ops::Range;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The closed set of node kinds the builder produces.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    /// Leaf text. Plain source text has no styles; text mutators may attach some.
    Text(StyledText),
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Size(u8),
    Color(Rgb),
    Align(Alignment),
    /// Link; without an explicit target the enclosed text is the target.
    Url(Option<String>),
    Spoiler(Option<String>),
    Quote(Option<String>),
    /// Image whose source is the enclosed text.
    Image { width: Option<u32> },
    List { ordered: bool },
    ListItem,
    Divider,
    /// Tag registered without built-in semantics.
    Unknown { tag: String, value: Option<String> },
}

impl NodeKind {
    /// Short lowercase name used in diagnostics and tree dumps.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Text(_) => "text",
            NodeKind::Bold => "b",
            NodeKind::Italic => "i",
            NodeKind::Underline => "u",
            NodeKind::Strikethrough => "s",
            NodeKind::Superscript => "sup",
            NodeKind::Subscript => "sub",
            NodeKind::Size(_) => "size",
            NodeKind::Color(_) => "color",
            NodeKind::Align(_) => "align",
            NodeKind::Url(_) => "url",
            NodeKind::Spoiler(_) => "spoiler",
            NodeKind::Quote(_) => "quote",
            NodeKind::Image { .. } => "img",
            NodeKind::List { ordered: true } => "ol",
            NodeKind::List { ordered: false } => "ul",
            NodeKind::ListItem => "li",
            NodeKind::Divider => "hr",
            NodeKind::Unknown { tag, .. } => tag,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    pub fn as_text(&self) -> Option<&StyledText> {
        match self {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    prototype: Option<PrototypeId>,
    span: Range<usize>,
    content: Range<usize>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Prototype that built this node. `None` for the root and for literal text.
    pub fn prototype(&self) -> Option<PrototypeId> {
        self.prototype
    }

    /// Byte range of the whole node in the source, delimiters included.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Byte range of the enclosed content, delimiters excluded.
    pub fn content(&self) -> Range<usize> {
        self.content.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    source: String,
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new(source: &str) -> Self {
        let root = Node {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
            prototype: None,
            span: 0..source.len(),
            content: 0..source.len(),
        };
        Self {
            source: source.to_string(),
            nodes: vec![root],
        }
    }

    pub(crate) fn push(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        prototype: Option<PrototypeId>,
        span: Range<usize>,
        content: Range<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            prototype,
            span,
            content,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Fix the end of a node once its closing token (or end of input) is known.
    pub(crate) fn close(&mut self, id: NodeId, content_end: usize, span_end: usize) {
        let node = &mut self.nodes[id.0];
        node.content.end = content_end;
        node.span.end = span_end;
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of this node's parent, the node itself included.
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &[],
        }
    }

    /// Source text of the whole node, delimiters included.
    pub fn source_text(&self, id: NodeId) -> &str {
        &self.source[self.nodes[id.0].span.clone()]
    }

    /// Source text enclosed by the node's delimiters.
    pub fn content_text(&self, id: NodeId) -> &str {
        &self.source[self.nodes[id.0].content.clone()]
    }

    /// Number of structural ancestors between this node and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// All nodes in document order (pre-order), starting with the root.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }
}
