//! Text styles and styled text values.
//!
//! A [`Style`] always covers a whole text run. Partial decorations (links found by
//! linkification, emoticons) are inline spans and live on the render fragments instead.

use serde::Serialize;
use std::fmt;

/// Smallest and largest `[size=N]` level.
pub const MIN_SIZE_LEVEL: u8 = 1;
pub const MAX_SIZE_LEVEL: u8 = 6;
/// Level used when a size tag carries no usable value.
pub const DEFAULT_SIZE_LEVEL: u8 = 3;

const RELATIVE_SIZES: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Style applied to an entire text run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "style", content = "value", rename_all = "snake_case")]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    /// Size level between [`MIN_SIZE_LEVEL`] and [`MAX_SIZE_LEVEL`].
    Size(u8),
    Color(Rgb),
    Align(Alignment),
    /// Link activation targeting the given URL.
    Link(String),
    /// Monospaced literal text.
    Code,
}

impl Style {
    /// Relative text size for a size level, clamped to the supported range.
    pub fn relative_size(level: u8) -> f32 {
        let level = level.clamp(MIN_SIZE_LEVEL, MAX_SIZE_LEVEL);
        RELATIVE_SIZES[usize::from(level - MIN_SIZE_LEVEL)]
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Style::Link(_))
    }
}

/// Horizontal alignment of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn name(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named colors accepted by `[color=...]`.
pub const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("orange", Rgb::new(0xff, 0xa5, 0x00)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("grey", Rgb::new(0x80, 0x80, 0x80)),
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb` or one of the [`NAMED_COLORS`].
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, rgb)| *rgb)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        match hex.len() {
            3 => {
                let mut expanded = [0u8; 3];
                for (slot, ch) in expanded.iter_mut().zip(hex.chars()) {
                    let nibble = ch.to_digit(16)? as u8;
                    *slot = nibble * 0x11;
                }
                Some(Rgb::new(expanded[0], expanded[1], expanded[2]))
            }
            6 => Some(Rgb::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Text plus the styles covering all of it.
///
/// Equality compares the text *and* the style list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyledText {
    pub text: String,
    pub styles: Vec<Style>,
}

impl StyledText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.add_style(style);
        self
    }

    /// Add a style unless an equal one is already present.
    pub fn add_style(&mut self, style: Style) {
        if !self.styles.contains(&style) {
            self.styles.push(style);
        }
    }

    pub fn has_style(&self, style: &Style) -> bool {
        self.styles.contains(style)
    }

    pub fn is_plain(&self) -> bool {
        self.styles.is_empty()
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::plain(text)
    }
}

/// Compare two style lists as sets.
pub fn same_styles(a: &[Style], b: &[Style]) -> bool {
    a.len() == b.len() && a.iter().all(|style| b.contains(style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::parse("#ff8000"), Some(Rgb::new(0xff, 0x80, 0x00)));
        assert_eq!(Rgb::parse("#F80"), Some(Rgb::new(0xff, 0x88, 0x00)));
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#gggggg"), None);
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(Rgb::parse("Red"), Some(Rgb::new(0xff, 0x00, 0x00)));
        assert_eq!(Rgb::parse("chartreuse"), None);
    }

    #[test]
    fn displays_colors_as_hex() {
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn relative_size_is_clamped() {
        assert_eq!(Style::relative_size(0), 0.5);
        assert_eq!(Style::relative_size(3), 1.0);
        assert_eq!(Style::relative_size(42), 2.0);
    }

    #[test]
    fn add_style_deduplicates() {
        let text = StyledText::plain("x")
            .with_style(Style::Bold)
            .with_style(Style::Bold);
        assert_eq!(text.styles, vec![Style::Bold]);
    }

    #[test]
    fn style_sets_ignore_order() {
        assert!(same_styles(
            &[Style::Bold, Style::Italic],
            &[Style::Italic, Style::Bold]
        ));
        assert!(!same_styles(&[Style::Bold], &[Style::Bold, Style::Italic]));
    }

    #[test]
    fn styled_text_equality_includes_styles() {
        assert_ne!(
            StyledText::plain("x"),
            StyledText::plain("x").with_style(Style::Bold)
        );
    }
}
