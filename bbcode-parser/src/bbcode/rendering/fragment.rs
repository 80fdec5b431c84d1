//! Render output types.

use crate::bbcode::error::RenderError;
use crate::bbcode::style::{same_styles, Style, StyledText};
use serde::Serialize;

/// Partial decoration inside a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineKind {
    Link { url: String },
    Mention { name: String },
    Emoticon { name: String },
}

/// Byte range `start..end` of a run's text carrying an [`InlineKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineSpan {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: InlineKind,
}

impl InlineSpan {
    pub fn new(start: usize, end: usize, kind: InlineKind) -> Self {
        Self { start, end, kind }
    }

    pub fn overlaps(&self, other: &InlineSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn shifted(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            kind: self.kind.clone(),
        }
    }
}

/// A run of text with the styles covering all of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub styles: Vec<Style>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<InlineSpan>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn add_style(&mut self, style: Style) {
        if !self.styles.contains(&style) {
            self.styles.push(style);
        }
    }

    pub fn has_style(&self, style: &Style) -> bool {
        self.styles.contains(style)
    }

    /// Whether `other` can be appended without changing either run's styling.
    pub fn can_merge(&self, other: &TextRun) -> bool {
        same_styles(&self.styles, &other.styles)
    }

    /// Append `other`'s text, moving its spans along.
    pub fn append(&mut self, other: TextRun) {
        let offset = self.text.len();
        self.text.push_str(&other.text);
        self.spans
            .extend(other.spans.iter().map(|span| span.shifted(offset)));
    }
}

impl From<StyledText> for TextRun {
    fn from(value: StyledText) -> Self {
        Self {
            text: value.text,
            styles: value.styles,
            spans: Vec::new(),
        }
    }
}

/// Composite element the view layer builds a dedicated widget for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Spoiler {
        title: Option<String>,
        content: Vec<Fragment>,
    },
    Quote {
        author: Option<String>,
        content: Vec<Fragment>,
    },
    Image {
        url: String,
        width: Option<u32>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Fragment>>,
    },
    Divider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Fragment {
    Text(TextRun),
    Widget(Widget),
}

impl Fragment {
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Fragment::Text(run) => Some(run),
            Fragment::Widget(_) => None,
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            Fragment::Widget(widget) => Some(widget),
            Fragment::Text(_) => None,
        }
    }
}

/// Everything one render pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub fragments: Vec<Fragment>,
    /// Recovered problems; each affected node was rendered as plain text.
    pub errors: Vec<RenderError>,
}

impl RenderOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Visible text of all fragments, widgets flattened, blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        write_plain(&self.fragments, &mut out);
        out
    }
}

fn write_plain(fragments: &[Fragment], out: &mut String) {
    for fragment in fragments {
        match fragment {
            Fragment::Text(run) => out.push_str(&run.text),
            Fragment::Widget(widget) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                match widget {
                    Widget::Spoiler { content, .. } | Widget::Quote { content, .. } => {
                        write_plain(content, out)
                    }
                    Widget::List { items, .. } => {
                        for item in items {
                            write_plain(item, out);
                            out.push('\n');
                        }
                    }
                    Widget::Image { url, .. } => out.push_str(url),
                    Widget::Divider => out.push_str("---"),
                }
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
}

/// Merge adjacent text runs with identical style sets. Order is preserved.
pub(super) fn merge_adjacent(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut merged: Vec<Fragment> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Text(run) => match merged.last_mut() {
                Some(Fragment::Text(last)) if last.can_merge(&run) => last.append(run),
                _ => merged.push(Fragment::Text(run)),
            },
            widget => merged.push(widget),
        }
    }
    merged
}
