//! Document tree to HTML, with the site's element overrides.
//!
//! | Node                 | Output                                           |
//! |----------------------|--------------------------------------------------|
//! | `h2`/`h3` heading    | `id` anchor plus `scroll-mt` offset class        |
//! | code block           | `<pre>` inside a wrapper with a copy button      |
//! | `<a>`                | opens in a new tab, `rel="noopener noreferrer"`  |
//! | `<table>`            | wrapped in a horizontal scroll container         |
//! | `Callout`            | labelled box with the severity icon              |
//! | `YouTube`            | responsive `youtube.com/embed` iframe            |
//! | `Screenshot`         | `<figure>` with optional caption                 |

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::compiler::{CalloutKind, Component, Document, Element, Node};
use crate::utils::html::{escape, is_raw_text_element, is_void_element};

/// Characters escaped in a video id path segment.
const VIDEO_ID: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

const YOUTUBE_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

pub fn render_document(doc: &Document) -> String {
    let mut out = String::with_capacity(4096);
    write_nodes(&mut out, &doc.children);
    out
}

pub fn write_nodes(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        write_node(out, node);
    }
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&escape(text)),
        Node::Element(el) => write_element(out, el),
        Node::Component(c) => write_component(out, c),
    }
}

fn write_element(out: &mut String, el: &Element) {
    match el.tag.as_str() {
        "a" => write_link(out, el),
        "table" => {
            out.push_str(r#"<div class="table-wrap">"#);
            write_plain(out, el);
            out.push_str("</div>");
        }
        _ => write_plain(out, el),
    }
}

fn write_link(out: &mut String, el: &Element) {
    // In-page anchors (footnotes) stay in the current tab.
    if el.attr("href").is_some_and(|href| href.starts_with('#')) {
        return write_plain(out, el);
    }

    out.push_str("<a");
    for (name, value) in &el.attrs {
        if name != "target" && name != "rel" {
            write_attr(out, name, value);
        }
    }
    out.push_str(r#" target="_blank" rel="noopener noreferrer">"#);
    write_nodes(out, &el.children);
    out.push_str("</a>");
}

fn write_plain(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        write_attr(out, name, value);
    }
    out.push('>');

    if is_void_element(&el.tag) {
        return;
    }

    if is_raw_text_element(&el.tag) {
        for child in &el.children {
            if let Node::Text(text) = child {
                out.push_str(text);
            }
        }
    } else {
        write_nodes(out, &el.children);
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

fn write_component(out: &mut String, component: &Component) {
    match component {
        Component::Heading {
            level,
            id,
            children,
        } => {
            out.push_str(&format!(
                r#"<h{level} id="{}" class="scroll-mt">"#,
                escape(id)
            ));
            write_nodes(out, children);
            out.push_str(&format!("</h{level}>"));
        }
        Component::CodeBlock { lang, code } => {
            out.push_str(r#"<div class="code-block"><button type="button" class="copy-button" aria-label="Copy code" data-code=""#);
            out.push_str(&escape(code));
            out.push_str(r#"">Copy</button><pre><code"#);
            if let Some(lang) = lang {
                out.push_str(r#" class="language-"#);
                out.push_str(&escape(lang));
                out.push('"');
            }
            out.push('>');
            out.push_str(&escape(code));
            out.push_str("</code></pre></div>");
        }
        Component::Callout { kind, children } => write_callout(out, *kind, children),
        Component::YouTube { id, title } => {
            let src = format!(
                "https://www.youtube.com/embed/{}",
                utf8_percent_encode(id, VIDEO_ID)
            );
            out.push_str(r#"<div class="video"><div class="video-frame"><iframe src=""#);
            out.push_str(&escape(&src));
            out.push_str(r#"" title=""#);
            out.push_str(&escape(title));
            out.push_str(r#"" allow=""#);
            out.push_str(YOUTUBE_ALLOW);
            out.push_str(r#"" allowfullscreen loading="lazy"></iframe></div></div>"#);
        }
        Component::Screenshot { src, alt, caption } => {
            out.push_str(r#"<figure class="screenshot"><div class="screenshot-frame"><img src=""#);
            out.push_str(&escape(src));
            out.push_str(r#"" alt=""#);
            out.push_str(&escape(alt));
            out.push_str(r#"" loading="lazy"></div>"#);
            if let Some(caption) = caption {
                out.push_str("<figcaption>");
                out.push_str(&escape(caption));
                out.push_str("</figcaption>");
            }
            out.push_str("</figure>");
        }
    }
}

fn write_callout(out: &mut String, kind: CalloutKind, children: &[Node]) {
    out.push_str(&format!(
        r#"<div class="callout callout-{kind}" role="note"><div class="callout-label"><span aria-hidden="true">{}</span><span>{}</span></div><div class="callout-body">"#,
        kind.icon(),
        kind.label()
    ));
    write_nodes(out, children);
    out.push_str("</div></div>");
}
