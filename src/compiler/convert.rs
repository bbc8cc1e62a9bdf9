//! Markdown + components to [`Document`] using pulldown-cmark.
//!
//! Events drive a stack of open frames. Markdown containers, inline HTML
//! elements and components each get a frame; closing one attaches its node
//! to the frame below (or the document root).
//!
//! HTML blocks are buffered whole, then split on component tags. Text that a
//! component opened in the same block encloses is compiled again as markdown;
//! any other text is raw HTML and goes through `tl`.

use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use super::component::{self, InlineHtml, RawTag, Segment, Spanned};
use super::error::{CompileError, CompileErrorKind};
use super::node::{Attrs, Component, Document, Element, Node, text_content};
use crate::utils::html::{is_void_element, unescape};
use crate::utils::slug::slugify;

/// Compile an article body.
pub fn compile(body: &str) -> Result<Document, CompileError> {
    let body = component::normalize_attributes(body);
    let children = Converter::new(&body, 1).run()?;
    Ok(Document { children })
}

fn options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

/// What a markdown frame turns into when it closes.
enum Kind {
    Element { tag: &'static str, attrs: Attrs },
    Paragraph,
    Heading(u8),
    CodeBlock(Option<String>),
    Image { src: String, title: String },
    TableHead,
    Metadata,
}

enum Frame {
    Markdown { kind: Kind, children: Vec<Node> },
    /// Lowercase inline HTML element awaiting its close tag.
    Html(Element),
    Component {
        name: String,
        attrs: Vec<(String, component::AttrValue)>,
        line: usize,
        children: Vec<Node>,
    },
}

impl Frame {
    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Self::Markdown { children, .. } | Self::Component { children, .. } => children,
            Self::Html(el) => &mut el.children,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ChunkMode {
    Block,
    Inline,
}

struct HtmlBuffer {
    text: String,
    line: usize,
}

struct Converter<'a> {
    source: &'a str,
    /// Byte offset of each line start in `source`.
    line_starts: Vec<usize>,
    /// Body line of `source`'s first line.
    base_line: usize,
    stack: Vec<Frame>,
    root: Vec<Node>,
    html_block: Option<HtmlBuffer>,
    in_table_head: bool,
}

impl<'a> Converter<'a> {
    fn new(source: &'a str, base_line: usize) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
            base_line,
            stack: Vec::new(),
            root: Vec::new(),
            html_block: None,
            in_table_head: false,
        }
    }

    fn run(mut self) -> Result<Vec<Node>, CompileError> {
        let source = self.source;
        for (event, range) in Parser::new_ext(source, options()).into_offset_iter() {
            let line = self.line_at(range.start);
            self.handle_event(event, line)?;
        }
        self.finish()
    }

    fn line_at(&self, offset: usize) -> usize {
        self.base_line + self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    fn handle_event(&mut self, event: Event<'_>, line: usize) -> Result<(), CompileError> {
        match event {
            Event::Start(tag) => self.start_tag(tag, line),
            Event::End(tag) => self.end_tag(tag)?,
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.add_inline_code(&code, None),
            Event::InlineMath(math) => self.add_inline_code(&math, Some("math-inline")),
            Event::DisplayMath(math) => self.add_inline_code(&math, Some("math-display")),
            Event::Html(html) => match self.html_block.as_mut() {
                Some(buffer) => buffer.text.push_str(&html),
                None => self.process_chunk(&html, line, ChunkMode::Block)?,
            },
            Event::InlineHtml(html) => self.process_chunk(&html, line, ChunkMode::Inline)?,
            Event::SoftBreak => self.add_text("\n"),
            Event::HardBreak => self.add_leaf("br", Vec::new()),
            Event::Rule => self.add_leaf("hr", Vec::new()),
            Event::FootnoteReference(name) => self.add_footnote_ref(&name),
            Event::TaskListMarker(checked) => self.add_task_marker(checked),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Markdown frames
    // ------------------------------------------------------------------------

    fn start_tag(&mut self, tag: Tag<'_>, line: usize) {
        match tag {
            Tag::HtmlBlock => {
                self.html_block = Some(HtmlBuffer {
                    text: String::new(),
                    line,
                });
                return;
            }
            Tag::TableHead => self.in_table_head = true,
            _ => {}
        }
        let kind = tag_to_kind(tag, self.in_table_head);
        self.stack.push(Frame::Markdown {
            kind,
            children: Vec::new(),
        });
    }

    fn end_tag(&mut self, end: TagEnd) -> Result<(), CompileError> {
        match end {
            TagEnd::HtmlBlock => return self.flush_html_block(),
            TagEnd::TableHead => self.in_table_head = false,
            _ => {}
        }

        self.close_inline_html();
        if let Some(Frame::Component { name, line, .. }) = self.stack.last() {
            return Err(CompileError::new(
                *line,
                CompileErrorKind::Unclosed(name.clone()),
            ));
        }

        if let Some(Frame::Markdown { kind, children }) = self.stack.pop() {
            for node in finish_kind(kind, children) {
                self.add_node(node);
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Node>, CompileError> {
        if self.html_block.is_some() {
            self.flush_html_block()?;
        }
        self.close_inline_html();
        if let Some(Frame::Component { name, line, .. }) = self.stack.last() {
            return Err(CompileError::new(
                *line,
                CompileErrorKind::Unclosed(name.clone()),
            ));
        }
        while let Some(frame) = self.stack.pop() {
            if let Frame::Markdown { kind, children } = frame {
                for node in finish_kind(kind, children) {
                    self.add_node(node);
                }
            }
        }
        Ok(self.root)
    }

    // ------------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------------

    fn add_node(&mut self, node: Node) {
        let children = match self.stack.last_mut() {
            Some(frame) => frame.children_mut(),
            None => &mut self.root,
        };
        children.push(node);
    }

    /// Add text, merging with a preceding text node.
    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = match self.stack.last_mut() {
            Some(frame) => frame.children_mut(),
            None => &mut self.root,
        };
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Node::Text(text.to_string()));
        }
    }

    fn add_leaf(&mut self, tag: &str, attrs: Attrs) {
        self.add_node(Node::Element(Element::new(tag, attrs, Vec::new())));
    }

    fn add_inline_code(&mut self, code: &str, class: Option<&str>) {
        let attrs = class
            .map(|c| vec![("class".to_string(), c.to_string())])
            .unwrap_or_default();
        self.add_node(Node::Element(Element::new(
            "code",
            attrs,
            vec![Node::Text(code.to_string())],
        )));
    }

    fn add_footnote_ref(&mut self, name: &str) {
        let link = Element::new(
            "a",
            vec![
                ("href".to_string(), format!("#fn-{name}")),
                ("id".to_string(), format!("fnref-{name}")),
            ],
            vec![Node::Text(format!("[{name}]"))],
        );
        self.add_node(Node::Element(Element::new(
            "sup",
            vec![("class".to_string(), "footnote-ref".to_string())],
            vec![Node::Element(link)],
        )));
    }

    fn add_task_marker(&mut self, checked: bool) {
        let mut attrs = vec![
            ("type".to_string(), "checkbox".to_string()),
            ("disabled".to_string(), String::new()),
        ];
        if checked {
            attrs.push(("checked".to_string(), String::new()));
        }
        self.add_leaf("input", attrs);
    }

    // ------------------------------------------------------------------------
    // HTML and components
    // ------------------------------------------------------------------------

    fn flush_html_block(&mut self) -> Result<(), CompileError> {
        match self.html_block.take() {
            Some(buffer) => self.process_chunk(&buffer.text, buffer.line, ChunkMode::Block),
            None => Ok(()),
        }
    }

    fn process_chunk(&mut self, chunk: &str, line: usize, mode: ChunkMode) -> Result<(), CompileError> {
        let line_of = |offset: usize| line + chunk[..offset].matches('\n').count();

        let segments = component::scan(chunk)
            .map_err(|(offset, kind)| CompileError::new(line_of(offset), kind))?;

        let has_components = segments
            .iter()
            .any(|s| !matches!(s.segment, Segment::Text(_)));
        if !has_components {
            match mode {
                ChunkMode::Block => self.add_raw_html(chunk),
                ChunkMode::Inline => self.add_inline_html(chunk),
            }
            return Ok(());
        }

        let base_depth = self.stack.len();
        for Spanned { offset, segment } in segments {
            let seg_line = line_of(offset);
            match segment {
                Segment::Text(text) => match mode {
                    ChunkMode::Block if self.stack.len() > base_depth => {
                        let source = dedent(text);
                        for node in Converter::new(&source, seg_line).run()? {
                            self.add_node(node);
                        }
                    }
                    ChunkMode::Block => self.add_raw_html(text),
                    ChunkMode::Inline => self.add_inline_html(text),
                },
                Segment::Open(tag) => self.open_component(tag, seg_line)?,
                Segment::Close(name) => self.close_component(name, seg_line)?,
            }
        }
        Ok(())
    }

    fn open_component(&mut self, tag: RawTag, line: usize) -> Result<(), CompileError> {
        if !component::is_known(&tag.name) {
            return Err(CompileError::new(
                line,
                CompileErrorKind::UnknownComponent(tag.name),
            ));
        }

        if tag.self_closing {
            let built = component::build(&tag.name, tag.attrs, Vec::new())
                .map_err(|kind| CompileError::new(line, kind))?;
            self.add_node(Node::Component(built));
        } else {
            self.stack.push(Frame::Component {
                name: tag.name,
                attrs: tag.attrs,
                line,
                children: Vec::new(),
            });
        }
        Ok(())
    }

    fn close_component(&mut self, name: String, line: usize) -> Result<(), CompileError> {
        self.close_inline_html();
        match self.stack.pop() {
            Some(Frame::Component {
                name: open,
                attrs,
                line: open_line,
                children,
            }) if open == name => {
                let built = component::build(&open, attrs, children)
                    .map_err(|kind| CompileError::new(open_line, kind))?;
                self.add_node(Node::Component(built));
                Ok(())
            }
            Some(Frame::Component { name: open, .. }) => Err(CompileError::new(
                line,
                CompileErrorKind::MismatchedClose {
                    expected: open,
                    found: name,
                },
            )),
            _ => Err(CompileError::new(
                line,
                CompileErrorKind::UnmatchedClose(name),
            )),
        }
    }

    /// Lowercase inline tag: open an element frame, add a leaf, or close.
    fn add_inline_html(&mut self, html: &str) {
        match component::parse_inline(html) {
            Some(InlineHtml::Open(tag)) => {
                let self_closing = tag.self_closing || is_void_element(&tag.name);
                let el = Element::new(tag.name.clone(), tag.html_attrs(), Vec::new());
                if self_closing {
                    self.add_node(Node::Element(el));
                } else {
                    self.stack.push(Frame::Html(el));
                }
            }
            Some(InlineHtml::Close(name)) => {
                let matches_top =
                    matches!(self.stack.last(), Some(Frame::Html(el)) if el.tag == name);
                if matches_top && let Some(Frame::Html(el)) = self.stack.pop() {
                    self.add_node(Node::Element(el));
                }
            }
            Some(InlineHtml::Comment) => {}
            None => self.add_raw_html(html),
        }
    }

    /// Close inline HTML elements left open at the end of their container.
    fn close_inline_html(&mut self) {
        while matches!(self.stack.last(), Some(Frame::Html(_))) {
            if let Some(Frame::Html(el)) = self.stack.pop() {
                self.add_node(Node::Element(el));
            }
        }
    }

    /// Parse raw HTML with tl and add the resulting nodes.
    fn add_raw_html(&mut self, html: &str) {
        let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
            self.add_text(html);
            return;
        };

        let parser = dom.parser();
        for handle in dom.children() {
            if let Some(node) = tl_node_to_node(*handle, parser) {
                self.add_node(node);
            }
        }
    }
}

/// Convert a tl node handle to a document node.
fn tl_node_to_node(handle: tl::NodeHandle, parser: &tl::Parser<'_>) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_lowercase();
            let attrs = tag
                .attributes()
                .iter()
                .map(|(key, value)| {
                    let value = value.map(|v| unescape(&v).into_owned()).unwrap_or_default();
                    (key.to_string(), value)
                })
                .collect();

            let children = tag
                .children()
                .top()
                .iter()
                .filter_map(|child| tl_node_to_node(*child, parser))
                .collect();

            Some(Node::Element(Element::new(name, attrs, children)))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            // Formatting whitespace between tags
            if text.trim().is_empty() && text.contains('\n') {
                None
            } else {
                Some(Node::Text(unescape(&text).into_owned()))
            }
        }
        tl::Node::Comment(_) => None,
    }
}

/// Frame kind for a pulldown-cmark tag.
fn tag_to_kind(tag: Tag<'_>, in_table_head: bool) -> Kind {
    let element = |tag: &'static str| Kind::Element {
        tag,
        attrs: Vec::new(),
    };

    match tag {
        // Block elements
        Tag::Paragraph => Kind::Paragraph,
        Tag::Heading { level, .. } => Kind::Heading(heading_level(level)),
        Tag::BlockQuote(_) => element("blockquote"),
        Tag::CodeBlock(kind) => Kind::CodeBlock(match kind {
            CodeBlockKind::Indented => None,
            CodeBlockKind::Fenced(info) => info
                .split_whitespace()
                .next()
                .map(str::to_string),
        }),
        Tag::List(Some(start)) => Kind::Element {
            tag: "ol",
            attrs: if start == 1 {
                Vec::new()
            } else {
                vec![("start".to_string(), start.to_string())]
            },
        },
        Tag::List(None) => element("ul"),
        Tag::Item => element("li"),
        Tag::FootnoteDefinition(name) => Kind::Element {
            tag: "div",
            attrs: vec![
                ("class".to_string(), "footnote".to_string()),
                ("id".to_string(), format!("fn-{}", &*name)),
            ],
        },

        // Table elements
        Tag::Table(_) => element("table"),
        Tag::TableHead => Kind::TableHead,
        Tag::TableRow => element("tr"),
        Tag::TableCell => element(if in_table_head { "th" } else { "td" }),

        // Inline elements
        Tag::Emphasis => element("em"),
        Tag::Strong => element("strong"),
        Tag::Strikethrough => element("del"),
        Tag::Superscript => element("sup"),
        Tag::Subscript => element("sub"),
        Tag::Link {
            dest_url, title, ..
        } => {
            let mut attrs = vec![("href".to_string(), dest_url.to_string())];
            if !title.is_empty() {
                attrs.push(("title".to_string(), title.to_string()));
            }
            Kind::Element { tag: "a", attrs }
        }
        Tag::Image {
            dest_url, title, ..
        } => Kind::Image {
            src: dest_url.to_string(),
            title: title.to_string(),
        },

        // Definition lists
        Tag::DefinitionList => element("dl"),
        Tag::DefinitionListTitle => element("dt"),
        Tag::DefinitionListDefinition => element("dd"),

        Tag::MetadataBlock(_) => Kind::Metadata,
        // Buffered separately; never reaches here
        Tag::HtmlBlock => element("div"),
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Turn a closed markdown frame into nodes.
fn finish_kind(kind: Kind, children: Vec<Node>) -> Vec<Node> {
    match kind {
        Kind::Element { tag, attrs } => vec![Node::Element(Element::new(tag, attrs, children))],
        Kind::Paragraph => finish_paragraph(children),
        Kind::Heading(level @ (2 | 3)) => {
            let id = slugify(&text_content(&children));
            vec![Node::Component(Component::Heading {
                level,
                id,
                children,
            })]
        }
        Kind::Heading(level) => vec![Node::Element(Element::new(
            format!("h{level}"),
            Vec::new(),
            children,
        ))],
        Kind::CodeBlock(lang) => vec![Node::Component(Component::CodeBlock {
            lang,
            code: text_content(&children),
        })],
        Kind::Image { src, title } => {
            let mut attrs = vec![
                ("src".to_string(), src),
                ("alt".to_string(), text_content(&children)),
            ];
            if !title.is_empty() {
                attrs.push(("title".to_string(), title));
            }
            vec![Node::Element(Element::new("img", attrs, Vec::new()))]
        }
        Kind::TableHead => {
            let row = Element::new("tr", Vec::new(), children);
            vec![Node::Element(Element::new(
                "thead",
                Vec::new(),
                vec![Node::Element(row)],
            ))]
        }
        Kind::Metadata => Vec::new(),
    }
}

/// A paragraph holding only block components (and whitespace) dissolves
/// into those components.
fn finish_paragraph(children: Vec<Node>) -> Vec<Node> {
    let only_blocks = children.iter().all(|node| match node {
        Node::Component(c) => c.is_block(),
        Node::Text(t) => t.trim().is_empty(),
        Node::Element(_) => false,
    });
    let has_block = children.iter().any(|n| matches!(n, Node::Component(_)));

    if only_blocks && has_block {
        children
            .into_iter()
            .filter(|n| matches!(n, Node::Component(_)))
            .collect()
    } else {
        vec![Node::Element(Element::new("p", Vec::new(), children))]
    }
}

/// Strip the indentation shared by every non-blank line.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    if indent == 0 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let strip = line
            .len()
            .min(indent)
            .min(line.len() - line.trim_start_matches([' ', '\t']).len());
        out.push_str(&line[strip..]);
    }
    out
}
