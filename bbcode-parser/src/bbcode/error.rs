//! Error types for the bbcode pipeline.
//!
//! Parsing itself never fails: unknown, unterminated and orphan tags degrade to
//! text. The types here cover registry misconfiguration, text mutation failures
//! (recovered by the builder) and materialization issues (recovered by the
//! materializer and reported alongside its output).

use serde::Serialize;
use thiserror::Error;

/// Misconfigured prototype registration. Raised at registration time, never while rendering.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tag `{0}` is already registered")]
    DuplicateTag(String),

    #[error("start pattern of tag `{0}` matches the empty string")]
    EmptyStartPattern(String),

    #[error("invalid pattern for tag `{tag}`: {source}")]
    Pattern {
        tag: String,
        #[source]
        source: regex::Error,
    },
}

/// A text mutator could not transform its enclosed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutateError {
    #[error("invalid target `{0}`")]
    InvalidTarget(String),

    #[error("cannot build url: {0}")]
    Url(#[from] url::ParseError),
}

/// A node could not be materialized as intended; a plain text fallback was rendered instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RenderError {
    #[error("`{node}` node requires the `{argument}` argument")]
    MissingArgument {
        node: &'static str,
        argument: &'static str,
    },

    #[error("`{node}` node has an invalid target: {reason}")]
    InvalidTarget { node: &'static str, reason: String },

    #[error("no renderer for tag `{tag}`")]
    UnsupportedNode { tag: String },
}
