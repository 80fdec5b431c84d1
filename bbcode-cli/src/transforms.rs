//! CLI output formats
//!
//! Tree formats show the parsed structure; render formats show the materialized
//! fragments.

use anyhow::Result;
use bbcode_parser::bbcode::formats::{
    snapshot_from_tree, to_json, to_treeviz_str_with_params, to_yaml,
};
use bbcode_parser::bbcode::{BBArgs, RenderError, Renderer};
use clap::ValueEnum;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Tree, one node per line
    Treeviz,
    /// Tree snapshot as JSON
    TreeJson,
    /// Render output as JSON
    Json,
    /// Render output as YAML
    Yaml,
}

/// Formatted text plus whatever the renderer recovered from.
pub struct Output {
    pub text: String,
    pub errors: Vec<RenderError>,
}

pub fn execute(
    source: &str,
    format: Format,
    renderer: &Renderer,
    args: &BBArgs,
    show_spans: bool,
) -> Result<Output> {
    let tree = renderer.parse(source);

    let output = match format {
        Format::Treeviz => {
            let mut params = HashMap::new();
            params.insert("show-span".to_string(), show_spans.to_string());
            Output {
                text: to_treeviz_str_with_params(&tree, &params),
                errors: Vec::new(),
            }
        }
        Format::TreeJson => Output {
            text: to_json(&snapshot_from_tree(&tree))?,
            errors: Vec::new(),
        },
        Format::Json | Format::Yaml => {
            let rendered = renderer.render_tree(&tree, args);
            let text = if format == Format::Json {
                to_json(&rendered)?
            } else {
                to_yaml(&rendered)?
            };
            Output {
                text,
                errors: rendered.errors,
            }
        }
    };
    Ok(output)
}
