//! Built-in prototypes
//!
//! Registration order (first match wins):
//!
//!     b, i, u, s, sup, sub, size, color, left, center, right, url, spoiler, quote,
//!     code, img, ul/ol, li, hr/divider, poll, then any passthrough tags.
//!
//! Patterns follow the `[tag]` / `[/tag]` and `[tag=value]` shapes, tolerating
//! blanks around the name.

use super::{Behavior, Mutator, PollOptions, Registry, TagKind};
use crate::bbcode::style::Alignment;
use crate::bbcode::error::RegistryError;
use once_cell::sync::Lazy;

/// The registry every [`Renderer::standard`](crate::bbcode::Renderer::standard) uses.
pub static STANDARD: Lazy<Registry> = Lazy::new(|| {
    Registry::with_options(&RegistryOptions::default())
        .expect("built-in prototypes must register")
});

/// Knobs for building a registry with the built-in tag set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    pub poll: PollOptions,
    /// Extra tag names registered after the built-ins as passthrough tags.
    pub passthrough_tags: Vec<String>,
}

const SIMPLE_TAGS: &[(TagKind, &str)] = &[
    (TagKind::Bold, "b"),
    (TagKind::Italic, "i"),
    (TagKind::Underline, "u"),
    (TagKind::Strikethrough, "s"),
    (TagKind::Superscript, "sup"),
    (TagKind::Subscript, "sub"),
];

impl Registry {
    /// The built-in tag set configured with `options`.
    pub fn with_options(options: &RegistryOptions) -> Result<Self, RegistryError> {
        let mut registry = Registry::new();

        for (tag, name) in SIMPLE_TAGS {
            registry.register_structural(tag.clone(), &simple_start(name), Some(&end(name)))?;
        }

        registry.register_structural(
            TagKind::Size,
            r" *size *= *(?P<value>\d+) *",
            Some(&end("size")),
        )?;
        registry.register_structural(
            TagKind::Color,
            r" *colou?r *= *(?P<value>#[0-9a-f]{6}|#[0-9a-f]{3}|[a-z]+) *",
            Some(&end("colou?r")),
        )?;
        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            let name = alignment.name();
            registry.register_structural(
                TagKind::Align(alignment),
                &simple_start(name),
                Some(&end(name)),
            )?;
        }
        registry.register_structural(TagKind::Url, &valued_start("url"), Some(&end("url")))?;
        registry.register_structural(
            TagKind::Spoiler,
            &valued_start("spoiler"),
            Some(&end("spoiler")),
        )?;
        registry.register_structural(TagKind::Quote, &valued_start("quote"), Some(&end("quote")))?;
        registry.register(
            TagKind::Code,
            &simple_start("code"),
            Some(&end("code")),
            Behavior::TextMutator(Mutator::Code),
        )?;
        registry.register_structural(
            TagKind::Image,
            r" *(img|image)( *(=|size *=) *(?P<value>\d+))? *",
            Some(r"/ *(img|image) *"),
        )?;
        registry.register_structural(
            TagKind::List,
            r" *(?P<value>ul|ol) *",
            Some(r"/ *(ul|ol) *"),
        )?;
        registry.register_structural(TagKind::ListItem, &simple_start("li"), Some(&end("li")))?;
        registry.register_structural(TagKind::Divider, r" *(hr|divider) *", None)?;
        registry.register(
            TagKind::Poll,
            r" *poll( .*?)?",
            Some(r"/ *poll *"),
            Behavior::TextMutator(Mutator::Poll(options.poll.clone())),
        )?;

        for name in &options.passthrough_tags {
            let escaped = regex::escape(name);
            registry.register_structural(
                TagKind::Custom(name.to_ascii_lowercase()),
                &valued_start(&escaped),
                Some(&end(&escaped)),
            )?;
        }

        Ok(registry)
    }
}

fn simple_start(name: &str) -> String {
    format!(" *{name} *")
}

fn valued_start(name: &str) -> String {
    format!(r" *{name}( *= *(?P<value>[^\]]*?))? *")
}

fn end(name: &str) -> String {
    format!(" */ *{name} *")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_builds() {
        assert_eq!(STANDARD.len(), 20);
        assert_eq!(
            STANDARD.iter().next().map(|(_, prototype)| prototype.tag().clone()),
            Some(TagKind::Bold)
        );
    }

    #[test]
    fn registration_order_is_kept() {
        let tags: Vec<_> = STANDARD
            .iter()
            .map(|(_, prototype)| prototype.tag().name().to_string())
            .collect();
        assert_eq!(
            tags,
            vec![
                "b", "i", "u", "s", "sup", "sub", "size", "color", "left", "center", "right",
                "url", "spoiler", "quote", "code", "img", "list", "li", "hr", "poll"
            ]
        );
    }

    #[test]
    fn passthrough_tags_are_appended() {
        let options = RegistryOptions {
            passthrough_tags: vec!["table".to_string()],
            ..RegistryOptions::default()
        };
        let registry = Registry::with_options(&options).unwrap();
        assert_eq!(registry.len(), 21);
        assert!(registry.find(&TagKind::Custom("table".into())).is_some());
    }

    #[test]
    fn passthrough_tags_cannot_shadow_each_other() {
        let options = RegistryOptions {
            passthrough_tags: vec!["table".to_string(), "TABLE".to_string()],
            ..RegistryOptions::default()
        };
        assert!(matches!(
            Registry::with_options(&options),
            Err(RegistryError::DuplicateTag(_))
        ));
    }

    #[test]
    fn divider_is_auto_closing() {
        let id = STANDARD.find(&TagKind::Divider).unwrap();
        assert!(STANDARD.get(id).descriptor().is_auto_closing());
    }
}
