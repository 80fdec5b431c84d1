//! Argument bag threaded through a render pass.
//!
//! A [`BBArgs`] is created once by the caller and handed to the materializer.
//! Nodes never mutate the bag they receive: to pass extra context to a subtree
//! they build an extended copy with [`BBArgs::extend`] or [`BBArgs::with`].

use super::style::StyledText;
use std::fmt;
use std::sync::Arc;

/// Enclosed source of the nearest quote or spoiler, overlaid by the materializer
/// on nested passes. Built-in nodes do not read it.
pub const TEXT_ARGUMENT: &str = "text";
pub const IMAGE_LOADER_ARGUMENT: &str = "image_loader";
/// Id of the viewing user. Carried through every pass for the caller's view layer;
/// no built-in node requires it.
pub const USER_ID_ARGUMENT: &str = "user_id";
pub const ENABLE_EMOTICONS_ARGUMENT: &str = "enable_emoticons";

/// Capability handle used by image nodes.
///
/// The pipeline does not load images; it only asks the loader where the view
/// layer should fetch them from.
pub trait ImageLoader: fmt::Debug + Send + Sync {
    /// Resolve a raw image reference. `None` means the reference cannot be loaded.
    fn resolve(&self, reference: &str) -> Option<String>;
}

/// A single value stored in a [`BBArgs`] bag.
#[derive(Debug, Clone)]
pub enum ArgValue {
    Text(StyledText),
    String(String),
    Bool(bool),
    Integer(i64),
    ImageLoader(Arc<dyn ImageLoader>),
}

impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArgValue::Text(a), ArgValue::Text(b)) => a == b,
            (ArgValue::String(a), ArgValue::String(b)) => a == b,
            (ArgValue::Bool(a), ArgValue::Bool(b)) => a == b,
            (ArgValue::Integer(a), ArgValue::Integer(b)) => a == b,
            (ArgValue::ImageLoader(a), ArgValue::ImageLoader(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<StyledText> for ArgValue {
    fn from(value: StyledText) -> Self {
        ArgValue::Text(value)
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Integer(value)
    }
}

/// Ordered key/value arguments for one render pass.
#[derive(Debug, Clone, Default)]
pub struct BBArgs {
    entries: Vec<(String, ArgValue)>,
}

impl BBArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place so insertion order is kept.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    pub fn with_text(self, text: impl Into<StyledText>) -> Self {
        self.with(TEXT_ARGUMENT, ArgValue::Text(text.into()))
    }

    pub fn with_image_loader(self, loader: Arc<dyn ImageLoader>) -> Self {
        self.with(IMAGE_LOADER_ARGUMENT, ArgValue::ImageLoader(loader))
    }

    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        self.with(USER_ID_ARGUMENT, ArgValue::String(user_id.into()))
    }

    pub fn with_emoticons(self, enabled: bool) -> Self {
        self.with(ENABLE_EMOTICONS_ARGUMENT, ArgValue::Bool(enabled))
    }

    /// Copy of `self` overlaid with every entry of `other`.
    pub fn extend(&self, other: &BBArgs) -> BBArgs {
        let mut merged = self.clone();
        for (key, value) in &other.entries {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn text(&self) -> Option<&StyledText> {
        match self.get(TEXT_ARGUMENT) {
            Some(ArgValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn image_loader(&self) -> Option<&Arc<dyn ImageLoader>> {
        match self.get(IMAGE_LOADER_ARGUMENT) {
            Some(ArgValue::ImageLoader(loader)) => Some(loader),
            _ => None,
        }
    }

    /// Caller-facing pass-through, see [`USER_ID_ARGUMENT`].
    pub fn user_id(&self) -> Option<&str> {
        match self.get(USER_ID_ARGUMENT) {
            Some(ArgValue::String(id)) => Some(id),
            _ => None,
        }
    }

    pub fn enable_emoticons(&self) -> bool {
        matches!(self.get(ENABLE_EMOTICONS_ARGUMENT), Some(ArgValue::Bool(true)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: ArgValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// Two bags are equal when they hold the same keys with equal values, in any order.
impl PartialEq for BBArgs {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}
