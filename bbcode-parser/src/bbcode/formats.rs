//! Output formats for trees and render output.
//!
//!     snapshot    Serializable, normalized view of a [`Tree`](super::tree::Tree).
//!     treeviz     One line per node, indentation drawn with box characters.
//!
//! JSON and YAML go through serde on [`TreeSnapshot`] and
//! [`RenderOutput`](super::rendering::RenderOutput).

mod snapshot;
mod treeviz;

pub use snapshot::{snapshot_from_tree, TreeSnapshot};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params};

use serde::Serialize;

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}
