//! # bbcode
//!
//! A parser and renderer for BBCode markup.
//!
//! The pipeline has four stages, each living in its own module:
//!
//!     matching    Finds bracket tokens whose inner text matches a registered prototype.
//!     registry    Ordered prototype table (tag identity -> node factory / text mutator).
//!     building    Turns the token stream into an arena-backed [`Tree`](bbcode::tree::Tree).
//!     rendering   Materializes a tree into platform-agnostic render fragments.
//!
//! Most callers only need [`Renderer`](bbcode::renderer::Renderer):
//!
//! ```rust,ignore
//! use bbcode_parser::bbcode::{BBArgs, Renderer};
//!
//! let output = Renderer::standard().render("plain [b]bold[/b]", &BBArgs::new());
//! ```
//!
//! The whole pipeline is synchronous. Rendering a large document should be
//! dispatched off latency-sensitive threads by the caller.

pub mod bbcode;
