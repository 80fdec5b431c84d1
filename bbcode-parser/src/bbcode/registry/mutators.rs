//! Text mutators: prototypes that rewrite their enclosed text instead of parsing it.

use crate::bbcode::error::MutateError;
use crate::bbcode::style::{Style, StyledText};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static POLL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Where poll links point and how they are labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Base of the web front end; poll pages live at `<base>poll/<id>`.
    pub base_url: String,
    /// Visible text replacing the poll id.
    pub link_label: String,
    /// Value of the `device` query parameter.
    pub device: String,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            base_url: "https://proxer.me/".to_string(),
            link_label: "Open poll".to_string(),
            device: "mobile".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutator {
    /// Keeps the enclosed text verbatim, styled as code.
    Code,
    /// Replaces a poll id with a fixed label linking to the poll page.
    Poll(PollOptions),
}

impl Mutator {
    pub fn mutate(&self, raw: &str) -> Result<StyledText, MutateError> {
        match self {
            Mutator::Code => Ok(StyledText::plain(raw).with_style(Style::Code)),
            Mutator::Poll(options) => mutate_poll(raw, options),
        }
    }
}

fn mutate_poll(raw: &str, options: &PollOptions) -> Result<StyledText, MutateError> {
    let id = raw.trim();
    if !POLL_ID.is_match(id) {
        return Err(MutateError::InvalidTarget(id.to_string()));
    }

    let mut url = Url::parse(&options.base_url)?.join(&format!("poll/{id}"))?;
    url.query_pairs_mut().append_pair("device", &options.device);

    Ok(StyledText::plain(options.link_label.as_str()).with_style(Style::Link(url.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_builds_labelled_link() {
        let text = Mutator::Poll(PollOptions::default()).mutate(" 42\n").unwrap();
        assert_eq!(text.text, "Open poll");
        assert_eq!(
            text.styles,
            vec![Style::Link(
                "https://proxer.me/poll/42?device=mobile".to_string()
            )]
        );
    }

    #[test]
    fn poll_rejects_invalid_ids() {
        let mutator = Mutator::Poll(PollOptions::default());
        assert_eq!(
            mutator.mutate("   "),
            Err(MutateError::InvalidTarget(String::new()))
        );
        assert!(mutator.mutate("4 2").is_err());
        assert!(mutator.mutate("../admin").is_err());
    }

    #[test]
    fn poll_reports_bad_base_url() {
        let options = PollOptions {
            base_url: "not a url".to_string(),
            ..PollOptions::default()
        };
        assert!(matches!(
            Mutator::Poll(options).mutate("1"),
            Err(MutateError::Url(_))
        ));
    }

    #[test]
    fn code_keeps_text_verbatim() {
        let text = Mutator::Code.mutate("[b]x[/b]").unwrap();
        assert_eq!(text.text, "[b]x[/b]");
        assert_eq!(text.styles, vec![Style::Code]);
    }
}
