//! Tag matcher
//!
//!     Scans raw text for bracket tokens (`[...]` without nested brackets) and checks the
//!     inner text against every registered prototype, in registration order. The first
//!     token that matches any start or end pattern is the next match; tokens nothing
//!     claims stay part of the surrounding text.

use super::registry::{PrototypeId, Registry, VALUE_GROUP};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static TAG_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// A bracket token claimed by a prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    pub prototype: PrototypeId,
    /// Byte range of the token, brackets included.
    pub span: Range<usize>,
    pub edge: Edge,
    /// The `value` capture of a start token, if any.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct TagMatcher<'r> {
    registry: &'r Registry,
}

impl<'r> TagMatcher<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Next start or end token at or after `cursor`.
    pub fn next_match(&self, text: &str, cursor: usize) -> Option<TagMatch> {
        TAG_TOKEN
            .captures_iter(&text[cursor..])
            .find_map(|caps| {
                let token = caps.get(0)?;
                let inner = caps.get(1)?.as_str();
                let span = cursor + token.start()..cursor + token.end();
                self.classify(inner, span)
            })
    }

    /// Next end token of `prototype` at or after `cursor`, ignoring every other tag.
    pub fn next_end(&self, text: &str, cursor: usize, prototype: PrototypeId) -> Option<Range<usize>> {
        let descriptor = self.registry.get(prototype).descriptor();
        TAG_TOKEN.captures_iter(&text[cursor..]).find_map(|caps| {
            let token = caps.get(0)?;
            let inner = caps.get(1)?.as_str();
            descriptor
                .matches_end(inner)
                .then(|| cursor + token.start()..cursor + token.end())
        })
    }

    fn classify(&self, inner: &str, span: Range<usize>) -> Option<TagMatch> {
        self.registry.iter().find_map(|(id, prototype)| {
            let descriptor = prototype.descriptor();
            if let Some(caps) = descriptor.match_start(inner) {
                return Some(TagMatch {
                    prototype: id,
                    span: span.clone(),
                    edge: Edge::Start,
                    value: caps.name(VALUE_GROUP).map(|value| value.as_str().to_string()),
                });
            }
            descriptor.matches_end(inner).then(|| TagMatch {
                prototype: id,
                span: span.clone(),
                edge: Edge::End,
                value: None,
            })
        })
    }
}
