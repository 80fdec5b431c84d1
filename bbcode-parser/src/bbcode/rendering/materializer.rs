use super::fragment::{merge_adjacent, Fragment, InlineKind, RenderOutput, TextRun, Widget};
use super::inline::{emoticon_spans, link_spans, link_target};
use crate::bbcode::args::{BBArgs, IMAGE_LOADER_ARGUMENT};
use crate::bbcode::error::RenderError;
use crate::bbcode::style::{Style, StyledText};
use crate::bbcode::tree::{NodeId, NodeKind, Tree};
use tracing::debug;

/// Switches for optional materializer behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Merge adjacent text runs with identical styles under the same parent.
    pub merge_adjacent_text: bool,
    /// Turn web URLs inside plain text into link spans.
    pub linkify_urls: bool,
    /// Turn `@name` inside plain text into mention spans.
    pub linkify_mentions: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            merge_adjacent_text: true,
            linkify_urls: true,
            linkify_mentions: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Materializer {
    options: MaterializeOptions,
}

impl Materializer {
    pub fn new(options: MaterializeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    /// Render `tree` into fragments. Recoverable problems end up in [`RenderOutput::errors`].
    pub fn materialize(&self, tree: &Tree, args: &BBArgs) -> RenderOutput {
        let mut pass = Pass {
            tree,
            options: &self.options,
            errors: Vec::new(),
        };
        let fragments = pass.children(tree.root(), args);
        RenderOutput {
            fragments,
            errors: pass.errors,
        }
    }
}

/// State of a single materialization pass.
struct Pass<'a> {
    tree: &'a Tree,
    options: &'a MaterializeOptions,
    errors: Vec<RenderError>,
}

impl Pass<'_> {
    fn children(&mut self, id: NodeId, args: &BBArgs) -> Vec<Fragment> {
        let tree = self.tree;
        let mut fragments = Vec::new();
        for &child in tree.children(id) {
            fragments.extend(self.node(child, args));
        }
        if self.options.merge_adjacent_text {
            merge_adjacent(fragments)
        } else {
            fragments
        }
    }

    fn node(&mut self, id: NodeId, args: &BBArgs) -> Vec<Fragment> {
        let tree = self.tree;
        match tree.kind(id) {
            NodeKind::Root | NodeKind::ListItem => self.children(id, args),
            NodeKind::Text(text) => vec![self.text(text, args)],
            NodeKind::Bold => self.styled(id, args, Style::Bold),
            NodeKind::Italic => self.styled(id, args, Style::Italic),
            NodeKind::Underline => self.styled(id, args, Style::Underline),
            NodeKind::Strikethrough => self.styled(id, args, Style::Strikethrough),
            NodeKind::Superscript => self.styled(id, args, Style::Superscript),
            NodeKind::Subscript => self.styled(id, args, Style::Subscript),
            NodeKind::Size(level) => self.styled(id, args, Style::Size(*level)),
            NodeKind::Color(rgb) => self.styled(id, args, Style::Color(*rgb)),
            NodeKind::Align(alignment) => self.styled(id, args, Style::Align(*alignment)),
            NodeKind::Url(target) => self.link(id, target.as_deref(), args),
            NodeKind::Spoiler(title) => {
                let content = self.nested(id, args);
                vec![Fragment::Widget(Widget::Spoiler {
                    title: title.clone(),
                    content,
                })]
            }
            NodeKind::Quote(author) => {
                let content = self.nested(id, args);
                vec![Fragment::Widget(Widget::Quote {
                    author: author.clone(),
                    content,
                })]
            }
            NodeKind::Image { width } => self.image(id, *width, args),
            NodeKind::List { ordered } => self.list(id, *ordered, args),
            NodeKind::Divider => vec![Fragment::Widget(Widget::Divider)],
            NodeKind::Unknown { tag, .. } => {
                let error = RenderError::UnsupportedNode { tag: tag.clone() };
                self.fallback(id, error)
            }
        }
    }

    fn text(&self, text: &StyledText, args: &BBArgs) -> Fragment {
        let mut run = TextRun::from(text.clone());
        if text.is_plain() {
            run.spans = link_spans(
                &run.text,
                self.options.linkify_urls,
                self.options.linkify_mentions,
            );
        }
        if args.enable_emoticons() && !text.has_style(&Style::Code) {
            for span in emoticon_spans(&run.text) {
                if !run.spans.iter().any(|existing| existing.overlaps(&span)) {
                    run.spans.push(span);
                }
            }
            run.spans.sort_by_key(|span| span.start);
        }
        Fragment::Text(run)
    }

    /// Children with `style` added to every text run. Widgets are left untouched.
    fn styled(&mut self, id: NodeId, args: &BBArgs, style: Style) -> Vec<Fragment> {
        let mut fragments = self.children(id, args);
        for fragment in &mut fragments {
            if let Fragment::Text(run) = fragment {
                run.add_style(style.clone());
            }
        }
        fragments
    }

    /// Children rendered as a nested pass with `text` overlaid to the enclosed source.
    /// Built-in nodes do not read the overlay.
    fn nested(&mut self, id: NodeId, args: &BBArgs) -> Vec<Fragment> {
        let overlay = args.clone().with_text(self.tree.content_text(id));
        self.children(id, &overlay)
    }

    /// Children styled as a link. Without an explicit target the children's text is
    /// the target; either way it must be an absolute URL.
    fn link(&mut self, id: NodeId, target: Option<&str>, args: &BBArgs) -> Vec<Fragment> {
        let recorded = self.errors.len();
        let mut fragments = self.children(id, args);
        let target = match target {
            Some(target) => target.to_string(),
            None => fragments
                .iter()
                .filter_map(Fragment::as_text)
                .map(|run| run.text.as_str())
                .collect(),
        };

        let checked = if target.trim().is_empty() {
            Err("link target is empty".to_string())
        } else {
            link_target(&target)
                .map_err(|err| format!("`{}` is not a link target: {err}", target.trim()))
        };
        let target = match checked {
            Ok(target) => target,
            Err(reason) => {
                self.errors.truncate(recorded);
                return self.fallback(id, RenderError::InvalidTarget { node: "url", reason });
            }
        };

        for fragment in &mut fragments {
            if let Fragment::Text(run) = fragment {
                run.spans.retain(|span| {
                    !matches!(
                        span.kind,
                        InlineKind::Link { .. } | InlineKind::Mention { .. }
                    )
                });
                run.styles.retain(|style| !style.is_link());
                run.add_style(Style::Link(target.clone()));
            }
        }
        fragments
    }

    fn image(&mut self, id: NodeId, width: Option<u32>, args: &BBArgs) -> Vec<Fragment> {
        let Some(loader) = args.image_loader() else {
            let error = RenderError::MissingArgument {
                node: "img",
                argument: IMAGE_LOADER_ARGUMENT,
            };
            return self.fallback(id, error);
        };

        let tree = self.tree;
        let reference = tree.content_text(id).trim();
        if reference.is_empty() {
            let error = RenderError::InvalidTarget {
                node: "img",
                reason: "image source is empty".to_string(),
            };
            return self.fallback(id, error);
        }

        match loader.resolve(reference) {
            Some(url) => vec![Fragment::Widget(Widget::Image { url, width })],
            None => {
                let error = RenderError::InvalidTarget {
                    node: "img",
                    reason: format!("cannot load `{reference}`"),
                };
                self.fallback(id, error)
            }
        }
    }

    fn list(&mut self, id: NodeId, ordered: bool, args: &BBArgs) -> Vec<Fragment> {
        let tree = self.tree;
        let mut items = Vec::new();
        for &child in tree.children(id) {
            match tree.kind(child) {
                NodeKind::ListItem => items.push(self.children(child, args)),
                NodeKind::Text(text) if text.text.trim().is_empty() => {}
                _ => {
                    let fragments = self.node(child, args);
                    if !fragments.is_empty() {
                        items.push(fragments);
                    }
                }
            }
        }
        vec![Fragment::Widget(Widget::List { ordered, items })]
    }

    /// Record `error` and render the node's raw enclosed text instead.
    fn fallback(&mut self, id: NodeId, error: RenderError) -> Vec<Fragment> {
        debug!(%error, node = id.index(), "rendering fallback text");
        self.errors.push(error);
        let raw = self.tree.content_text(id);
        if raw.is_empty() {
            Vec::new()
        } else {
            vec![Fragment::Text(TextRun::plain(raw))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbcode::args::ImageLoader;
    use crate::bbcode::building::TreeBuilder;
    use crate::bbcode::registry::{Registry, RegistryOptions, STANDARD};
    use std::sync::Arc;

    #[derive(Debug)]
    struct PrefixLoader;

    impl ImageLoader for PrefixLoader {
        fn resolve(&self, reference: &str) -> Option<String> {
            (!reference.contains(' ')).then(|| format!("cdn://{reference}"))
        }
    }

    fn render(source: &str, args: &BBArgs) -> RenderOutput {
        let tree = TreeBuilder::new(&STANDARD).build(source);
        Materializer::default().materialize(&tree, args)
    }

    fn run(text: &str, styles: &[Style]) -> Fragment {
        Fragment::Text(TextRun {
            text: text.to_string(),
            styles: styles.to_vec(),
            spans: Vec::new(),
        })
    }

    #[test]
    fn bold_scenario_yields_three_fragments() {
        let output = render("plain [b]bold text[/b] plain", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![
                run("plain ", &[]),
                run("bold text", &[Style::Bold]),
                run(" plain", &[]),
            ]
        );
        assert!(output.is_clean());
    }

    #[test]
    fn sibling_texts_under_bold_merge() {
        let output = render("[b]one[/i]two[/b]", &BBArgs::new());
        assert_eq!(output.fragments, vec![run("one[/i]two", &[Style::Bold])]);
    }

    #[test]
    fn merging_can_be_disabled() {
        let tree = TreeBuilder::new(&STANDARD).build("[b]one[/i]two[/b]");
        let materializer = Materializer::new(MaterializeOptions {
            merge_adjacent_text: false,
            ..MaterializeOptions::default()
        });
        let output = materializer.materialize(&tree, &BBArgs::new());
        assert_eq!(output.fragments.len(), 3);
    }

    #[test]
    fn styles_stack_from_inner_to_outer() {
        let output = render("[b][i]x[/i][/b]", &BBArgs::new());
        assert_eq!(output.fragments, vec![run("x", &[Style::Italic, Style::Bold])]);
    }

    #[test]
    fn styles_skip_widgets() {
        let output = render("[b]a[hr]b[/b]", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![
                run("a", &[Style::Bold]),
                Fragment::Widget(Widget::Divider),
                run("b", &[Style::Bold]),
            ]
        );
    }

    #[test]
    fn poll_becomes_labelled_link() {
        let output = render("vote: [poll] 42 [/poll]", &BBArgs::new());
        assert_eq!(output.fragments.len(), 2);
        let poll = output.fragments[1].as_text().unwrap();
        assert_eq!(poll.text, "Open poll");
        assert!(matches!(&poll.styles[..], [Style::Link(url)] if url.contains("42")));
    }

    #[test]
    fn poll_label_comes_from_registry_options() {
        let mut options = RegistryOptions::default();
        options.poll.link_label = "Zur Umfrage".to_string();
        let registry = Registry::with_options(&options).unwrap();
        let tree = TreeBuilder::new(&registry).build("[poll]7[/poll]");
        let output = Materializer::default().materialize(&tree, &BBArgs::new());
        assert_eq!(output.plain_text(), "Zur Umfrage");
    }

    #[test]
    fn url_with_explicit_target() {
        let output = render("[url=https://a.example]site[/url]", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![run("site", &[Style::Link("https://a.example".into())])]
        );
    }

    #[test]
    fn url_without_target_uses_content() {
        let output = render("[url]https://a.example[/url]", &BBArgs::new());
        let link = output.fragments[0].as_text().unwrap();
        assert_eq!(link.styles, vec![Style::Link("https://a.example".into())]);
        assert!(link.spans.is_empty());
    }

    #[test]
    fn empty_url_falls_back() {
        let output = render("[url][/url]", &BBArgs::new());
        assert!(output.fragments.is_empty());
        assert!(matches!(
            output.errors[..],
            [RenderError::InvalidTarget { node: "url", .. }]
        ));
    }

    #[test]
    fn url_target_is_taken_from_child_text() {
        let output = render("[url][b]https://a.example[/b][/url]", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![run(
                "https://a.example",
                &[Style::Bold, Style::Link("https://a.example".into())]
            )]
        );
        assert!(output.is_clean());
    }

    #[test]
    fn url_without_valid_target_falls_back_to_source() {
        let output = render("[url][b]x[/b][/url]", &BBArgs::new());
        assert_eq!(output.fragments, vec![run("[b]x[/b]", &[])]);
        assert!(matches!(
            output.errors[..],
            [RenderError::InvalidTarget { node: "url", .. }]
        ));
    }

    #[test]
    fn relative_explicit_target_falls_back() {
        let output = render("[url=/profile]me[/url]", &BBArgs::new());
        assert_eq!(output.fragments, vec![run("me", &[])]);
        assert_eq!(output.errors.len(), 1);
    }

    #[test]
    fn failed_link_keeps_only_its_own_error() {
        let output = render("[url][img]a.png[/img][/url]", &BBArgs::new());
        assert_eq!(output.fragments, vec![run("[img]a.png[/img]", &[])]);
        assert!(matches!(
            output.errors[..],
            [RenderError::InvalidTarget { node: "url", .. }]
        ));
    }

    #[test]
    fn outer_link_replaces_inner_link() {
        let output = render(
            "[url=https://a.example][poll]42[/poll][/url]",
            &BBArgs::new(),
        );
        assert_eq!(
            output.fragments,
            vec![run("Open poll", &[Style::Link("https://a.example".into())])]
        );
    }

    #[test]
    fn image_needs_a_loader() {
        let output = render("[img]cat.png[/img]", &BBArgs::new());
        assert_eq!(output.fragments, vec![run("cat.png", &[])]);
        assert_eq!(
            output.errors,
            vec![RenderError::MissingArgument {
                node: "img",
                argument: "image_loader",
            }]
        );
    }

    #[test]
    fn image_resolves_through_loader() {
        let args = BBArgs::new().with_image_loader(Arc::new(PrefixLoader));
        let output = render("[img=120] cat.png [/img]", &args);
        assert_eq!(
            output.fragments,
            vec![Fragment::Widget(Widget::Image {
                url: "cdn://cat.png".into(),
                width: Some(120),
            })]
        );
    }

    #[test]
    fn unloadable_image_falls_back() {
        let args = BBArgs::new().with_image_loader(Arc::new(PrefixLoader));
        let output = render("[img]a b[/img]", &args);
        assert_eq!(output.fragments, vec![run("a b", &[])]);
        assert_eq!(output.errors.len(), 1);
    }

    #[test]
    fn unknown_tags_fall_back_to_raw_content() {
        let options = RegistryOptions {
            passthrough_tags: vec!["table".into()],
            ..RegistryOptions::default()
        };
        let registry = Registry::with_options(&options).unwrap();
        let tree = TreeBuilder::new(&registry).build("[table][b]cell[/b][/table] after");
        let output = Materializer::default().materialize(&tree, &BBArgs::new());
        assert_eq!(output.fragments, vec![run("[b]cell[/b] after", &[])]);
        assert_eq!(
            output.errors,
            vec![RenderError::UnsupportedNode {
                tag: "table".into()
            }]
        );
    }

    #[test]
    fn quote_embeds_children() {
        let output = render("[quote=Alice]hi [i]there[/i][/quote]", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![Fragment::Widget(Widget::Quote {
                author: Some("Alice".into()),
                content: vec![run("hi ", &[]), run("there", &[Style::Italic])],
            })]
        );
    }

    #[test]
    fn spoiler_is_one_widget_even_inside_bold() {
        let output = render("[b][spoiler]x[/spoiler][/b]", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![Fragment::Widget(Widget::Spoiler {
                title: None,
                content: vec![run("x", &[])],
            })]
        );
    }

    #[test]
    fn list_items_and_blank_text() {
        let output = render("[ol]\n[li]a[/li]\n[li][b]b[/b][/li]\n[/ol]", &BBArgs::new());
        assert_eq!(
            output.fragments,
            vec![Fragment::Widget(Widget::List {
                ordered: true,
                items: vec![vec![run("a", &[])], vec![run("b", &[Style::Bold])]],
            })]
        );
    }

    #[test]
    fn plain_text_is_linkified() {
        let output = render("ping @bob at https://x.example", &BBArgs::new());
        let text = output.fragments[0].as_text().unwrap();
        let kinds: Vec<_> = text.spans.iter().map(|span| &span.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &InlineKind::Mention { name: "bob".into() },
                &InlineKind::Link {
                    url: "https://x.example".into()
                },
            ]
        );
    }

    #[test]
    fn code_is_neither_linkified_nor_emoticonized() {
        let args = BBArgs::new().with_emoticons(true);
        let output = render("[code]:) https://x.example[/code]", &args);
        let text = output.fragments[0].as_text().unwrap();
        assert_eq!(text.styles, vec![Style::Code]);
        assert!(text.spans.is_empty());
    }

    #[test]
    fn emoticons_follow_the_argument() {
        let without = render("hi :)", &BBArgs::new());
        assert!(without.fragments[0].as_text().unwrap().spans.is_empty());

        let with = render("hi :)", &BBArgs::new().with_emoticons(true));
        let spans = &with.fragments[0].as_text().unwrap().spans;
        assert_eq!(
            spans[0].kind,
            InlineKind::Emoticon {
                name: "smile".into()
            }
        );
    }

    #[test]
    fn rendering_twice_is_equal() {
        let tree = TreeBuilder::new(&STANDARD)
            .build("[size=5][color=red]x[/color][/size] [img]a.png[/img] @me");
        let args = BBArgs::new().with_image_loader(Arc::new(PrefixLoader));
        let materializer = Materializer::default();
        assert_eq!(
            materializer.materialize(&tree, &args),
            materializer.materialize(&tree, &args)
        );
    }
}
