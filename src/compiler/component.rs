//! JSX-style component tags embedded in markdown.
//!
//! Component tags start with an uppercase letter. Lowercase tags are plain
//! HTML and pass through untouched. Attribute values take these forms:
//!
//! | Syntax         | Value                         |
//! |----------------|-------------------------------|
//! | `a="x"`        | `x`                           |
//! | `a='x'`        | `x`                           |
//! | `a={"x"}`      | `x` (string literal)          |
//! | `a={x + 1}`    | `x + 1` (expression text)     |
//! | `a`            | boolean `true`                |

use std::borrow::Cow;

use super::error::CompileErrorKind;
use super::node::{Attrs, CalloutKind, Component, Node};
use crate::utils::html;

const KNOWN: [&str; 3] = ["Callout", "YouTube", "Screenshot"];

const DEFAULT_YOUTUBE_TITLE: &str = "YouTube video";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Expr(String),
    Bool,
}

impl AttrValue {
    /// Value as a component prop.
    pub fn into_prop(self) -> String {
        match self {
            Self::Str(s) | Self::Expr(s) => s,
            Self::Bool => "true".to_string(),
        }
    }

    /// Value as an HTML attribute (booleans are empty).
    pub fn into_html(self) -> String {
        match self {
            Self::Str(s) | Self::Expr(s) => s,
            Self::Bool => String::new(),
        }
    }
}

/// An opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub name: String,
    pub attrs: Vec<(String, AttrValue)>,
    pub self_closing: bool,
}

impl RawTag {
    /// Re-emit with every value double-quoted, the form CommonMark accepts.
    fn to_quoted(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            match value {
                AttrValue::Str(v) | AttrValue::Expr(v) => {
                    out.push_str("=\"");
                    out.push_str(&html::escape(v));
                    out.push('"');
                }
                AttrValue::Bool => {}
            }
        }
        out.push_str(if self.self_closing { " />" } else { ">" });
        out
    }

    /// Attributes for a plain HTML element.
    pub fn html_attrs(self) -> Attrs {
        self.attrs
            .into_iter()
            .map(|(k, v)| (k, v.into_html()))
            .collect()
    }
}

/// A piece of an HTML chunk, split on component tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Open(RawTag),
    Close(String),
}

/// Segment plus its byte offset in the chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub offset: usize,
    pub segment: Segment<'a>,
}

/// Whether the bytes at `pos` start a component tag (`<X` or `</X`).
fn component_start(s: &str, pos: usize) -> bool {
    let rest = &s.as_bytes()[pos..];
    match rest {
        [b'<', b'/', c, ..] | [b'<', c, ..] => c.is_ascii_uppercase(),
        _ => false,
    }
}

/// Split an HTML chunk into text and component tags. Comments stay in text.
pub fn scan(chunk: &str) -> Result<Vec<Spanned<'_>>, (usize, CompileErrorKind)> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(found) = chunk[pos..].find('<') {
        let at = pos + found;

        if chunk[at..].starts_with("<!--") {
            pos = chunk[at..].find("-->").map_or(chunk.len(), |end| at + end + 3);
            continue;
        }
        if !component_start(chunk, at) {
            pos = at + 1;
            continue;
        }

        if at > text_start {
            out.push(Spanned {
                offset: text_start,
                segment: Segment::Text(&chunk[text_start..at]),
            });
        }

        let (segment, end) = if chunk[at..].starts_with("</") {
            let (name, end) = parse_close(chunk, at).map_err(|kind| (at, kind))?;
            (Segment::Close(name), end)
        } else {
            let (tag, end) = parse_open(chunk, at).map_err(|kind| (at, kind))?;
            (Segment::Open(tag), end)
        };
        out.push(Spanned {
            offset: at,
            segment,
        });
        pos = end;
        text_start = end;
    }

    if text_start < chunk.len() {
        out.push(Spanned {
            offset: text_start,
            segment: Segment::Text(&chunk[text_start..]),
        });
    }
    Ok(out)
}

/// One inline HTML event: a lone tag or a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineHtml {
    Open(RawTag),
    Close(String),
    Comment,
}

/// Parse a single inline HTML fragment, `None` when it is not a lone tag.
pub fn parse_inline(fragment: &str) -> Option<InlineHtml> {
    let fragment = fragment.trim();
    if fragment.starts_with("<!--") {
        return Some(InlineHtml::Comment);
    }
    let (inline, end) = if fragment.starts_with("</") {
        let (name, end) = parse_close(fragment, 0).ok()?;
        (InlineHtml::Close(name.to_ascii_lowercase()), end)
    } else {
        let (mut tag, end) = parse_open(fragment, 0).ok()?;
        tag.name.make_ascii_lowercase();
        (InlineHtml::Open(tag), end)
    };
    (end == fragment.len()).then_some(inline)
}

// ============================================================================
// Tag parsing
// ============================================================================

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn skip_ws(s: &str, mut pos: usize) -> usize {
    while let Some(c) = s[pos..].chars().next()
        && c.is_whitespace()
    {
        pos += c.len_utf8();
    }
    pos
}

fn take_name(s: &str, start: usize) -> (&str, usize) {
    let end = s[start..]
        .char_indices()
        .find(|&(_, c)| !is_name_char(c))
        .map_or(s.len(), |(i, _)| start + i);
    (&s[start..end], end)
}

fn malformed(s: &str, at: usize) -> CompileErrorKind {
    let snippet: String = s[at..].chars().take(40).collect();
    let snippet = snippet.lines().next().unwrap_or_default();
    CompileErrorKind::MalformedTag(snippet.to_string())
}

/// Parse `</Name>` at `at`. Returns the name and the end offset.
fn parse_close(s: &str, at: usize) -> Result<(String, usize), CompileErrorKind> {
    let (name, pos) = take_name(s, at + 2);
    if name.is_empty() {
        return Err(malformed(s, at));
    }
    let pos = skip_ws(s, pos);
    if !s[pos..].starts_with('>') {
        return Err(malformed(s, at));
    }
    Ok((name.to_string(), pos + 1))
}

/// Parse `<Name attr=... >` or `<Name ... />` at `at`.
fn parse_open(s: &str, at: usize) -> Result<(RawTag, usize), CompileErrorKind> {
    let (name, mut pos) = take_name(s, at + 1);
    if name.is_empty() {
        return Err(malformed(s, at));
    }
    let mut attrs = Vec::new();

    loop {
        pos = skip_ws(s, pos);
        let rest = &s[pos..];
        if rest.starts_with("/>") {
            let tag = RawTag {
                name: name.to_string(),
                attrs,
                self_closing: true,
            };
            return Ok((tag, pos + 2));
        }
        if rest.starts_with('>') {
            let tag = RawTag {
                name: name.to_string(),
                attrs,
                self_closing: false,
            };
            return Ok((tag, pos + 1));
        }

        let (key, after_key) = take_name(s, pos);
        if key.is_empty() {
            return Err(malformed(s, at));
        }
        pos = skip_ws(s, after_key);

        if !s[pos..].starts_with('=') {
            attrs.push((key.to_string(), AttrValue::Bool));
            continue;
        }
        pos = skip_ws(s, pos + 1);

        let (value, after_value) = parse_value(s, pos).ok_or_else(|| malformed(s, at))?;
        attrs.push((key.to_string(), value));
        pos = after_value;
    }
}

fn parse_value(s: &str, pos: usize) -> Option<(AttrValue, usize)> {
    let quote = s[pos..].chars().next()?;
    match quote {
        '"' | '\'' => {
            let len = s[pos + 1..].find(quote)?;
            let raw = &s[pos + 1..pos + 1 + len];
            Some((
                AttrValue::Str(html::unescape(raw).into_owned()),
                pos + len + 2,
            ))
        }
        '{' => {
            let len = matching_brace(&s[pos..])?;
            let inner = s[pos + 1..pos + len].trim();
            let value = string_literal(inner)
                .map_or_else(|| AttrValue::Expr(inner.to_string()), AttrValue::Str);
            Some((value, pos + len + 1))
        }
        _ => {
            let mut len = s[pos..]
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(s.len() - pos);
            if s[pos..pos + len].ends_with('/') && s[pos + len..].starts_with('>') {
                len -= 1;
            }
            (len > 0).then(|| (AttrValue::Str(s[pos..pos + len].to_string()), pos + len))
        }
    }
}

/// Offset of the `}` closing the `{` at index 0, skipping quoted strings.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `"x"`, `'x'` or `` `x` `` with no interpolation.
fn string_literal(s: &str) -> Option<String> {
    let quote = s.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || s.len() < 2 || !s.ends_with(quote) {
        return None;
    }
    let inner = &s[1..s.len() - 1];
    if inner.contains(quote) && !inner.contains('\\') {
        return None;
    }
    if quote == '`' && inner.contains("${") {
        return None;
    }
    Some(
        inner
            .replace(&format!("\\{quote}"), &quote.to_string())
            .replace("\\\\", "\\"),
    )
}

// ============================================================================
// Expression attributes
// ============================================================================

/// Rewrite component tags with `{...}` attribute values into double-quoted
/// form, so the markdown parser recognizes them as HTML.
///
/// Fenced code blocks and inline code spans are left alone.
pub fn normalize_attributes(body: &str) -> Cow<'_, str> {
    if !body.contains('<') {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut changed = false;
    let mut fence: Option<(char, usize)> = None;
    let mut code_run = 0usize;
    let mut at_line_start = true;
    let mut pos = 0;

    while pos < body.len() {
        if at_line_start {
            let line_end = body[pos..].find('\n').map_or(body.len(), |i| pos + i + 1);
            let line = &body[pos..line_end];
            let marker = fence_marker(line);
            if line.trim().is_empty() {
                code_run = 0;
            }

            let in_fence = match (fence, marker) {
                (None, Some(open)) => {
                    fence = Some(open);
                    true
                }
                (Some((ch, len)), Some((mch, mlen))) if ch == mch && mlen >= len => {
                    fence = None;
                    true
                }
                (Some(_), _) => true,
                (None, None) => false,
            };
            if in_fence {
                out.push_str(line);
                pos = line_end;
                continue;
            }
            at_line_start = false;
        }

        let Some(c) = body[pos..].chars().next() else {
            break;
        };

        match c {
            '\n' => {
                out.push(c);
                pos += 1;
                at_line_start = true;
            }
            '`' => {
                let run = body[pos..].chars().take_while(|&b| b == '`').count();
                code_run = match code_run {
                    0 => run,
                    open if open == run => 0,
                    open => open,
                };
                out.push_str(&body[pos..pos + run]);
                pos += run;
            }
            '<' if code_run == 0 && component_start(body, pos) && !body[pos..].starts_with("</") => {
                match parse_open(body, pos) {
                    Ok((tag, end)) if needs_quoting(&body[pos..end]) => {
                        out.push_str(&tag.to_quoted());
                        changed = true;
                        pos = end;
                    }
                    _ => {
                        out.push(c);
                        pos += 1;
                    }
                }
            }
            _ => {
                out.push(c);
                pos += c.len_utf8();
            }
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(body)
    }
}

/// Whether the raw tag text uses a form CommonMark rejects.
fn needs_quoting(raw: &str) -> bool {
    raw.contains('{')
}

/// Opening/closing code fence: up to three spaces, then three or more
/// backticks or tildes.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = rest.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

// ============================================================================
// Component construction
// ============================================================================

pub fn is_known(name: &str) -> bool {
    KNOWN.contains(&name)
}

/// Build a component from its props and compiled children.
pub fn build(
    name: &str,
    attrs: Vec<(String, AttrValue)>,
    children: Vec<Node>,
) -> Result<Component, CompileErrorKind> {
    let mut props: Vec<(String, String)> = attrs
        .into_iter()
        .map(|(k, v)| (k, v.into_prop()))
        .collect();
    let mut take = |key: &str| {
        props
            .iter()
            .position(|(k, _)| k == key)
            .map(|i| props.swap_remove(i).1)
    };

    match name {
        "Callout" => {
            let kind = match take("type") {
                None => CalloutKind::default(),
                Some(value) => value
                    .parse::<CalloutKind>()
                    .map_err(|()| CompileErrorKind::InvalidCalloutType(value))?,
            };
            Ok(Component::Callout { kind, children })
        }
        "YouTube" => {
            let id = required(take("id"), "YouTube", "id")?;
            let title = take("title")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_YOUTUBE_TITLE.to_string());
            Ok(Component::YouTube { id, title })
        }
        "Screenshot" => {
            let src = required(take("src"), "Screenshot", "src")?;
            let alt = required(take("alt"), "Screenshot", "alt")?;
            let caption = take("caption").filter(|c| !c.trim().is_empty());
            Ok(Component::Screenshot { src, alt, caption })
        }
        other => Err(CompileErrorKind::UnknownComponent(other.to_string())),
    }
}

fn required(
    value: Option<String>,
    component: &'static str,
    attribute: &'static str,
) -> Result<String, CompileErrorKind> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CompileErrorKind::MissingAttribute {
            component,
            attribute,
        })
}
