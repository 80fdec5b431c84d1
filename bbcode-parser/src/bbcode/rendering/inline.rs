//! Inline span detection inside text leaves: web links, `@mentions` and emoticons.

use super::fragment::{InlineKind, InlineSpan};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static WEB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"\[\]]*[^\s<>"\[\].,;:!?)']"#).unwrap()
});

static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[^ \n]+").unwrap());

/// Emoticon codes and the names the view layer resolves to images.
pub const EMOTICONS: &[(&str, &str)] = &[
    (":)", "smile"),
    (":-)", "smile"),
    (":(", "sad"),
    (":-(", "sad"),
    (";)", "wink"),
    (":D", "grin"),
    (":P", "tongue"),
    (":O", "surprised"),
    ("<3", "heart"),
];

static EMOTICON: Lazy<Regex> = Lazy::new(|| {
    let mut codes: Vec<&str> = EMOTICONS.iter().map(|(code, _)| *code).collect();
    // Longest first so `:-)` wins over `:)`-style prefixes.
    codes.sort_by_key(|code| std::cmp::Reverse(code.len()));
    let alternation = codes
        .iter()
        .map(|code| regex::escape(code))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?:{alternation})")).unwrap()
});

/// Spans for web URLs and `@mentions`, sorted by position. Mentions inside a URL are skipped.
pub fn link_spans(text: &str, urls: bool, mentions: bool) -> Vec<InlineSpan> {
    let mut spans = Vec::new();

    if urls {
        for found in WEB_URL.find_iter(text) {
            let url = with_scheme(found.as_str());
            spans.push(InlineSpan::new(
                found.start(),
                found.end(),
                InlineKind::Link { url },
            ));
        }
    }

    if mentions {
        for found in MENTION.find_iter(text) {
            if found.len() < 2 {
                continue;
            }
            let span = InlineSpan::new(
                found.start(),
                found.end(),
                InlineKind::Mention {
                    name: found.as_str()[1..].to_string(),
                },
            );
            if !spans.iter().any(|existing| existing.overlaps(&span)) {
                spans.push(span);
            }
        }
    }

    spans.sort_by_key(|span| span.start);
    spans
}

/// Bare `www.` hosts get an `http://` scheme.
fn with_scheme(target: &str) -> String {
    if target.to_ascii_lowercase().starts_with("www.") {
        format!("http://{target}")
    } else {
        target.to_string()
    }
}

/// Check that `target` is an absolute URL, after the `www.` rule. The target is
/// returned as written, not in normalized form.
pub fn link_target(target: &str) -> Result<String, url::ParseError> {
    let target = with_scheme(target.trim());
    Url::parse(&target)?;
    Ok(target)
}

/// Spans for emoticon codes standing on their own (start of text or after whitespace).
pub fn emoticon_spans(text: &str) -> Vec<InlineSpan> {
    EMOTICON
        .find_iter(text)
        .filter(|found| {
            text[..found.start()]
                .chars()
                .next_back()
                .map_or(true, char::is_whitespace)
        })
        .filter_map(|found| {
            EMOTICONS
                .iter()
                .find(|(code, _)| *code == found.as_str())
                .map(|(_, name)| {
                    InlineSpan::new(
                        found.start(),
                        found.end(),
                        InlineKind::Emoticon {
                            name: name.to_string(),
                        },
                    )
                })
        })
        .collect()
}
