//! End-to-end rendering scenarios.

use bbcode_parser::bbcode::rendering::InlineKind;
use bbcode_parser::bbcode::{
    render, BBArgs, Fragment, ImageLoader, RenderError, Renderer, Style, TextRun, Widget,
};
use std::sync::Arc;

#[derive(Debug)]
struct Passthrough;

impl ImageLoader for Passthrough {
    fn resolve(&self, reference: &str) -> Option<String> {
        Some(reference.to_string())
    }
}

fn text(value: &str, styles: &[Style]) -> Fragment {
    Fragment::Text(TextRun {
        text: value.to_string(),
        styles: styles.to_vec(),
        spans: Vec::new(),
    })
}

#[test]
fn plain_bold_plain() {
    let output = render("plain [b]bold text[/b] plain", &BBArgs::new());
    assert_eq!(
        output.fragments,
        vec![
            text("plain ", &[]),
            text("bold text", &[Style::Bold]),
            text(" plain", &[]),
        ]
    );
}

#[test]
fn poll_link_ignores_whitespace() {
    for source in ["[poll]42[/poll]", "[poll]  42\n[/poll]"] {
        let output = render(source, &BBArgs::new());
        assert_eq!(output.fragments.len(), 1);
        let run = output.fragments[0].as_text().unwrap();
        assert_eq!(run.text, "Open poll");
        match &run.styles[..] {
            [Style::Link(url)] => assert!(url.contains("/poll/42")),
            other => panic!("unexpected styles: {other:?}"),
        }
    }
}

#[test]
fn invalid_poll_renders_raw_text() {
    let output = render("[poll]no id here[/poll]", &BBArgs::new());
    assert_eq!(output.plain_text(), "no id here");
}

#[test]
fn malformed_document_degrades_node_by_node() {
    let source = "[b]ok[/b] [img]pic.png[/img] [/i] [size=9]big [u]open";
    let output = render(source, &BBArgs::new());

    assert_eq!(output.fragments[0], text("ok", &[Style::Bold]));
    assert!(output
        .fragments
        .iter()
        .any(|fragment| fragment.as_text().map(|run| run.text.contains("pic.png")) == Some(true)));
    assert_eq!(
        output.errors,
        vec![RenderError::MissingArgument {
            node: "img",
            argument: "image_loader",
        }]
    );
    let last = output.fragments.last().unwrap().as_text().unwrap();
    assert_eq!(last.text, "open");
    assert_eq!(last.styles, vec![Style::Underline, Style::Size(6)]);
}

#[test]
fn nested_widgets() {
    let args = BBArgs::new().with_image_loader(Arc::new(Passthrough));
    let output = render(
        "[spoiler=Ending][quote=Ann][img]a.png[/img][/quote][/spoiler]",
        &args,
    );
    assert_eq!(
        output.fragments,
        vec![Fragment::Widget(Widget::Spoiler {
            title: Some("Ending".into()),
            content: vec![Fragment::Widget(Widget::Quote {
                author: Some("Ann".into()),
                content: vec![Fragment::Widget(Widget::Image {
                    url: "a.png".into(),
                    width: None,
                })],
            })],
        })]
    );
    assert!(output.is_clean());
}

#[test]
fn mentions_are_linked_in_plain_text() {
    let output = render("thanks @mika!", &BBArgs::new());
    let run = output.fragments[0].as_text().unwrap();
    assert_eq!(
        run.spans[0].kind,
        InlineKind::Mention {
            name: "mika!".into()
        }
    );
}

#[test]
fn render_is_idempotent() {
    let renderer = Renderer::standard();
    let args = BBArgs::new()
        .with_image_loader(Arc::new(Passthrough))
        .with_user_id("7")
        .with_emoticons(true);
    let tree = renderer.parse("[b]a :)[/b][ol][li]x[/li][/ol][poll]1[/poll]");
    assert_eq!(renderer.render_tree(&tree, &args), renderer.render_tree(&tree, &args));
}

#[test]
fn output_serializes_to_json() {
    let output = render("[b]x[/b][hr]", &BBArgs::new());
    let json = bbcode_parser::bbcode::formats::to_json(&output).unwrap();
    assert!(json.contains("\"style\": \"bold\""));
    assert!(json.contains("\"widget\": \"divider\""));
}
