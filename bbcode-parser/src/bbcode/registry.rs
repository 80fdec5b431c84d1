//! Prototype registry
//!
//!     A prototype pairs a tag identity with a [`TagDescriptor`] (start/end patterns)
//!     and a [`Behavior`]. Structural prototypes build container nodes whose content is
//!     parsed recursively. Text mutators transform their enclosed text as a literal and
//!     never recurse.
//!
//!     The registry is an explicit ordered list: matching tries prototypes in
//!     registration order and the first one wins, so the order carries meaning.
//!     Registration is the only place a registry can fail; once built it is read-only
//!     and shared by reference between render passes.
//!
//!     See [standard](standard) for the built-in tag set.

mod mutators;
pub mod standard;

pub use mutators::{Mutator, PollOptions};
pub use standard::{RegistryOptions, STANDARD};

use super::error::RegistryError;
use super::style::{Alignment, Rgb, DEFAULT_SIZE_LEVEL, MAX_SIZE_LEVEL, MIN_SIZE_LEVEL};
use super::tree::NodeKind;
use regex::{Captures, Regex};

/// Named capture group carrying a tag's argument (`[size=4]` -> `4`).
pub const VALUE_GROUP: &str = "value";

/// Tag identity. Two prototypes may never share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Size,
    Color,
    /// One prototype per alignment, so `[left]` only closes with `[/left]`.
    Align(Alignment),
    Url,
    Spoiler,
    Quote,
    Code,
    Image,
    List,
    ListItem,
    Divider,
    Poll,
    /// Passthrough tag without built-in rendering.
    Custom(String),
}

impl TagKind {
    pub fn name(&self) -> &str {
        match self {
            TagKind::Bold => "b",
            TagKind::Italic => "i",
            TagKind::Underline => "u",
            TagKind::Strikethrough => "s",
            TagKind::Superscript => "sup",
            TagKind::Subscript => "sub",
            TagKind::Size => "size",
            TagKind::Color => "color",
            TagKind::Align(alignment) => alignment.name(),
            TagKind::Url => "url",
            TagKind::Spoiler => "spoiler",
            TagKind::Quote => "quote",
            TagKind::Code => "code",
            TagKind::Image => "img",
            TagKind::List => "list",
            TagKind::ListItem => "li",
            TagKind::Divider => "hr",
            TagKind::Poll => "poll",
            TagKind::Custom(name) => name,
        }
    }

    /// Build the node for a matched start token.
    ///
    /// Returns `None` when the captured value is unusable; the token is then kept as
    /// literal text.
    pub fn construct(&self, value: Option<&str>) -> Option<NodeKind> {
        let value = value.map(str::trim).filter(|value| !value.is_empty());
        let kind = match self {
            TagKind::Bold => NodeKind::Bold,
            TagKind::Italic => NodeKind::Italic,
            TagKind::Underline => NodeKind::Underline,
            TagKind::Strikethrough => NodeKind::Strikethrough,
            TagKind::Superscript => NodeKind::Superscript,
            TagKind::Subscript => NodeKind::Subscript,
            TagKind::Size => NodeKind::Size(
                value
                    .and_then(|value| match value.parse::<u64>() {
                        Ok(level) => Some(level),
                        // Overflowing digit runs saturate.
                        Err(_) if value.bytes().all(|b| b.is_ascii_digit()) => Some(u64::MAX),
                        Err(_) => None,
                    })
                    .map(|level| {
                        level.clamp(MIN_SIZE_LEVEL.into(), MAX_SIZE_LEVEL.into()) as u8
                    })
                    .unwrap_or(DEFAULT_SIZE_LEVEL),
            ),
            TagKind::Color => NodeKind::Color(Rgb::parse(value?)?),
            TagKind::Align(alignment) => NodeKind::Align(*alignment),
            TagKind::Url => NodeKind::Url(value.map(str::to_string)),
            TagKind::Spoiler => NodeKind::Spoiler(value.map(str::to_string)),
            TagKind::Quote => NodeKind::Quote(value.map(str::to_string)),
            TagKind::Image => NodeKind::Image {
                width: value.and_then(|value| value.parse().ok()),
            },
            TagKind::List => NodeKind::List {
                ordered: value.is_some_and(|value| value.eq_ignore_ascii_case("ol")),
            },
            TagKind::ListItem => NodeKind::ListItem,
            TagKind::Divider => NodeKind::Divider,
            TagKind::Custom(name) => NodeKind::Unknown {
                tag: name.clone(),
                value: value.map(str::to_string),
            },
            TagKind::Code | TagKind::Poll => return None,
        };
        Some(kind)
    }
}

/// Start and optional end pattern of a tag.
///
/// Patterns match the text between `[` and `]`. They are anchored and compiled
/// case-insensitive with `.` matching newlines. A descriptor without an end
/// pattern is auto-closing.
#[derive(Debug, Clone)]
pub struct TagDescriptor {
    start: Regex,
    end: Option<Regex>,
}

impl TagDescriptor {
    pub fn new(start: &str, end: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            start: compile(start)?,
            end: end.map(compile).transpose()?,
        })
    }

    pub fn match_start<'t>(&self, inner: &'t str) -> Option<Captures<'t>> {
        self.start.captures(inner)
    }

    pub fn matches_end(&self, inner: &str) -> bool {
        self.end.as_ref().is_some_and(|end| end.is_match(inner))
    }

    pub fn is_auto_closing(&self) -> bool {
        self.end.is_none()
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?is)^(?:{pattern})$"))
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Structural,
    TextMutator(Mutator),
}

#[derive(Debug, Clone)]
pub struct Prototype {
    tag: TagKind,
    descriptor: TagDescriptor,
    behavior: Behavior,
}

impl Prototype {
    pub fn tag(&self) -> &TagKind {
        &self.tag
    }

    pub fn descriptor(&self) -> &TagDescriptor {
        &self.descriptor
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }
}

/// Position of a prototype in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrototypeId(usize);

impl PrototypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    prototypes: Vec<Prototype>,
}

impl Registry {
    /// An empty registry. See [`Registry::standard`] for the built-in tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry with default options.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    /// Append a prototype. Fails on duplicate identities, start patterns matching the
    /// empty string and invalid regular expressions.
    pub fn register(
        &mut self,
        tag: TagKind,
        start: &str,
        end: Option<&str>,
        behavior: Behavior,
    ) -> Result<PrototypeId, RegistryError> {
        if self.find(&tag).is_some() {
            return Err(RegistryError::DuplicateTag(tag.name().to_string()));
        }
        let descriptor = TagDescriptor::new(start, end).map_err(|source| RegistryError::Pattern {
            tag: tag.name().to_string(),
            source,
        })?;
        if descriptor.match_start("").is_some() {
            return Err(RegistryError::EmptyStartPattern(tag.name().to_string()));
        }

        let id = PrototypeId(self.prototypes.len());
        self.prototypes.push(Prototype {
            tag,
            descriptor,
            behavior,
        });
        Ok(id)
    }

    /// Shorthand for a structural tag.
    pub fn register_structural(
        &mut self,
        tag: TagKind,
        start: &str,
        end: Option<&str>,
    ) -> Result<PrototypeId, RegistryError> {
        self.register(tag, start, end, Behavior::Structural)
    }

    pub fn get(&self, id: PrototypeId) -> &Prototype {
        &self.prototypes[id.0]
    }

    pub fn find(&self, tag: &TagKind) -> Option<PrototypeId> {
        self.prototypes
            .iter()
            .position(|prototype| &prototype.tag == tag)
            .map(PrototypeId)
    }

    /// Prototypes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (PrototypeId, &Prototype)> {
        self.prototypes
            .iter()
            .enumerate()
            .map(|(index, prototype)| (PrototypeId(index), prototype))
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
