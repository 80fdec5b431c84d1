//! Tree builder
//!
//!     Consumes the token stream from the [`TagMatcher`] and builds a [`Tree`]. Open
//!     structural nodes are kept on an explicit stack, so nesting depth is bounded by
//!     memory rather than by the call stack.
//!
//!     Rules:
//!     - Text before a token becomes a plain text leaf of the current node.
//!     - A structural start token opens a node under the current one. Auto-closing
//!       prototypes produce a childless node instead.
//!     - An end token closes the innermost open node built by the same prototype. Nodes
//!       opened after it are closed implicitly where the end token starts.
//!     - An end token with no open counterpart is kept as its own literal text leaf.
//!     - A text-mutator start token swallows everything up to its end token (or the end
//!       of input) and becomes a single text leaf holding the mutated text. If mutation
//!       fails the leaf holds the raw enclosed text.
//!     - Nodes still open at the end of input extend to the end of input.
//!     - Start tokens whose value the prototype rejects stay literal text.

use super::matching::{Edge, TagMatch, TagMatcher};
use super::registry::{Behavior, Mutator, PrototypeId, Registry};
use super::style::StyledText;
use super::tree::{NodeId, NodeKind, Tree};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'r> {
    registry: &'r Registry,
    matcher: TagMatcher<'r>,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    prototype: Option<PrototypeId>,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            matcher: TagMatcher::new(registry),
        }
    }

    pub fn build(&self, source: &str) -> Tree {
        let mut state = BuildState::new(source);
        let mut cursor = 0;

        while let Some(tag) = self.matcher.next_match(source, cursor) {
            let token_end = tag.span.end;
            match tag.edge {
                Edge::Start => self.open(&mut state, tag),
                Edge::End => state.close(tag),
            }
            // Text mutators consume past their own token.
            cursor = token_end.max(state.text_start);
        }

        state.finish()
    }

    fn open(&self, state: &mut BuildState<'_>, tag: TagMatch) {
        let prototype = self.registry.get(tag.prototype);
        match prototype.behavior() {
            Behavior::Structural => {
                let Some(kind) = prototype.tag().construct(tag.value.as_deref()) else {
                    trace!(tag = prototype.tag().name(), "start token rejected, keeping it as text");
                    return;
                };
                state.flush_text(tag.span.start);
                let parent = state.current();
                let end = tag.span.end;
                let node = state
                    .tree
                    .push(parent, kind, Some(tag.prototype), tag.span.clone(), end..end);
                if !prototype.descriptor().is_auto_closing() {
                    state.stack.push(Frame {
                        node,
                        prototype: Some(tag.prototype),
                    });
                }
                state.text_start = end;
            }
            Behavior::TextMutator(mutator) => self.mutate(state, tag, mutator),
        }
    }

    fn mutate(&self, state: &mut BuildState<'_>, tag: TagMatch, mutator: &Mutator) {
        state.flush_text(tag.span.start);

        let source = state.source;
        let (content_end, span_end) = match self.matcher.next_end(source, tag.span.end, tag.prototype)
        {
            Some(end) => (end.start, end.end),
            None => (source.len(), source.len()),
        };
        let raw = &source[tag.span.end..content_end];
        let text = mutator.mutate(raw).unwrap_or_else(|err| {
            debug!(%err, raw, "text mutation failed, keeping raw text");
            StyledText::plain(raw)
        });

        let parent = state.current();
        state.tree.push(
            parent,
            NodeKind::Text(text),
            Some(tag.prototype),
            tag.span.start..span_end,
            tag.span.end..content_end,
        );
        state.text_start = span_end;
    }
}

/// Mutable bookkeeping for a single `build` call.
struct BuildState<'s> {
    source: &'s str,
    tree: Tree,
    stack: Vec<Frame>,
    /// Start of text not yet emitted as a leaf.
    text_start: usize,
}

impl<'s> BuildState<'s> {
    fn new(source: &'s str) -> Self {
        let tree = Tree::new(source);
        let root = tree.root();
        Self {
            source,
            tree,
            stack: vec![Frame {
                node: root,
                prototype: None,
            }],
            text_start: 0,
        }
    }

    fn current(&self) -> NodeId {
        self.stack
            .last()
            .map(|frame| frame.node)
            .unwrap_or_else(|| self.tree.root())
    }

    /// Emit pending text up to `end` as a leaf of the current node.
    fn flush_text(&mut self, end: usize) {
        if end > self.text_start {
            let range = self.text_start..end;
            let parent = self.current();
            let text = StyledText::plain(&self.source[range.clone()]);
            self.tree
                .push(parent, NodeKind::Text(text), None, range.clone(), range);
        }
        self.text_start = self.text_start.max(end);
    }

    fn close(&mut self, tag: TagMatch) {
        self.flush_text(tag.span.start);

        let open = self
            .stack
            .iter()
            .rposition(|frame| frame.prototype == Some(tag.prototype));

        match open {
            Some(depth) => {
                while self.stack.len() > depth + 1 {
                    if let Some(frame) = self.stack.pop() {
                        debug!(node = frame.node.index(), "implicitly closing node");
                        self.tree.close(frame.node, tag.span.start, tag.span.start);
                    }
                }
                if let Some(frame) = self.stack.pop() {
                    self.tree.close(frame.node, tag.span.start, tag.span.end);
                }
            }
            None => {
                trace!(span = ?tag.span, "orphan end token kept as text");
                let parent = self.current();
                let text = StyledText::plain(&self.source[tag.span.clone()]);
                self.tree.push(
                    parent,
                    NodeKind::Text(text),
                    None,
                    tag.span.clone(),
                    tag.span.clone(),
                );
            }
        }

        self.text_start = tag.span.end;
    }

    fn finish(mut self) -> Tree {
        let end = self.source.len();
        self.flush_text(end);
        while self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.tree.close(frame.node, end, end);
            }
        }
        self.tree
    }
}
