//! View materialization
//!
//!     Walks a built [`Tree`](super::tree::Tree) and produces [`Fragment`]s for an external
//!     view layer. Text-bearing nodes become [`TextRun`]s carrying whole-run styles and
//!     partial inline spans; everything else becomes exactly one [`Widget`].
//!
//!     Materialization never fails as a whole. A node that cannot be rendered as intended
//!     (missing argument, unusable target, unknown tag) records a
//!     [`RenderError`](super::error::RenderError) in the output and renders its raw
//!     enclosed text instead.

mod fragment;
mod inline;
mod materializer;

pub use fragment::{Fragment, InlineKind, InlineSpan, RenderOutput, TextRun, Widget};
pub use inline::{emoticon_spans, link_spans, link_target, EMOTICONS};
pub use materializer::{MaterializeOptions, Materializer};
