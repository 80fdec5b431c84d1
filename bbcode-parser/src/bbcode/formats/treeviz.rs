//! Treeviz formatter for parse trees
//!
//! One line per node, nesting drawn with box characters, two columns per level:
//!
//!     <prefix><connector> <icon> <label>
//!
//! Text labels are quoted so leading and trailing blanks stay visible, and every label
//! is truncated to 30 characters.
//!
//! Icons
//!     root: ⧉    text: ◦    b: 𝐁    i: 𝐼    u: _    s: ~    sup: ˆ    sub: ˬ
//!     size: ±    color: ◐   align: ≡   url: ⊕   spoiler: ▒   quote: "
//!     img: ▣     ul/ol: ☰   li: •     hr: ―    passthrough: ○

use super::snapshot::{snapshot_from_tree, TreeSnapshot};
use crate::bbcode::tree::Tree;
use std::collections::HashMap;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "root" => "⧉",
        "text" => "◦",
        "b" => "𝐁",
        "i" => "𝐼",
        "u" => "_",
        "s" => "~",
        "sup" => "ˆ",
        "sub" => "ˬ",
        "size" => "±",
        "color" => "◐",
        "align" => "≡",
        "url" => "⊕",
        "spoiler" => "▒",
        "quote" => "\"",
        "img" => "▣",
        "ul" | "ol" => "☰",
        "li" => "•",
        "hr" => "―",
        _ => "○",
    }
}

fn label(snapshot: &TreeSnapshot, show_span: bool) -> String {
    let mut label = if snapshot.node_type == "text" {
        format!("{:?}", truncate(&snapshot.label, 30))
    } else if snapshot.label.is_empty() {
        snapshot.node_type.clone()
    } else {
        format!("{}={}", snapshot.node_type, truncate(&snapshot.label, 30))
    };
    if show_span {
        label.push_str(&format!(" @{}..{}", snapshot.span.0, snapshot.span.1));
    }
    label
}

fn format_snapshot(
    snapshot: &TreeSnapshot,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_span: bool,
) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let icon = get_icon(&snapshot.node_type);

    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon,
        label(snapshot, show_span)
    ));

    if !snapshot.children.is_empty() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        let child_count = snapshot.children.len();

        for (i, child) in snapshot.children.iter().enumerate() {
            output.push_str(&format_snapshot(
                child,
                &child_prefix,
                i,
                child_count,
                show_span,
            ));
        }
    }

    output
}

pub fn to_treeviz_str(tree: &Tree) -> String {
    to_treeviz_str_with_params(tree, &HashMap::new())
}

/// Supported params: `show-span` (`true`/`false`, default `false`).
pub fn to_treeviz_str_with_params(tree: &Tree, params: &HashMap<String, String>) -> String {
    let show_span = params
        .get("show-span")
        .map(|v| v != "false")
        .unwrap_or(false);

    let snapshot = snapshot_from_tree(tree);
    let mut output = format!(
        "{} {}\n",
        get_icon(&snapshot.node_type),
        label(&snapshot, show_span)
    );
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, "", i, child_count, show_span));
    }
    output
}
