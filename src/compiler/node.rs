//! Compiled document tree.
//!
//! Plain markdown becomes [`Element`]s. Anything rendered through an override
//! (anchored headings, copyable code, the custom components) is a
//! [`Component`] so the renderer can match on it exhaustively.

use std::fmt;
use std::str::FromStr;

use crate::toc::HeadingEntry;

pub type Attrs = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Component(Component),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>, attrs: Attrs, children: Vec<Node>) -> Self {
        Self {
            tag: tag.into(),
            attrs,
            children,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// `h2`/`h3` with an anchor id.
    Heading {
        level: u8,
        id: String,
        children: Vec<Node>,
    },
    /// Code block paired with a copy button.
    CodeBlock { lang: Option<String>, code: String },
    Callout {
        kind: CalloutKind,
        children: Vec<Node>,
    },
    YouTube { id: String, title: String },
    Screenshot {
        src: String,
        alt: String,
        caption: Option<String>,
    },
}

impl Component {
    /// Block components lift out of a paragraph that holds nothing else.
    pub fn is_block(&self) -> bool {
        !matches!(self, Self::Heading { .. })
    }
}

/// Callout severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalloutKind {
    Tip,
    Warning,
    #[default]
    Note,
}

impl CalloutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tip => "Tip",
            Self::Warning => "Warning",
            Self::Note => "Note",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Tip => "💡",
            Self::Warning => "⚠️",
            Self::Note => "📌",
        }
    }
}

impl FromStr for CalloutKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tip" => Ok(Self::Tip),
            "warning" => Ok(Self::Warning),
            "note" => Ok(Self::Note),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CalloutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concatenated text of a node list, the way a reader would see it.
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
            Node::Component(Component::Heading { children, .. })
            | Node::Component(Component::Callout { children, .. }) => collect_text(children, out),
            Node::Component(Component::CodeBlock { code, .. }) => out.push_str(code),
            Node::Component(Component::YouTube { .. } | Component::Screenshot { .. }) => {}
        }
    }
}

/// Compiled article body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    /// Anchored headings in document order, including those nested in callouts.
    pub fn headings(&self) -> Vec<HeadingEntry> {
        let mut out = Vec::new();
        collect_headings(&self.children, &mut out);
        out
    }
}

fn collect_headings(nodes: &[Node], out: &mut Vec<HeadingEntry>) {
    for node in nodes {
        match node {
            Node::Component(Component::Heading {
                level,
                id,
                children,
            }) => out.push(HeadingEntry {
                id: id.clone(),
                text: text_content(children).trim().to_string(),
                level: *level,
            }),
            Node::Component(Component::Callout { children, .. }) => {
                collect_headings(children, out);
            }
            Node::Element(el) => collect_headings(&el.children, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callout_kind_parse() {
        assert_eq!("tip".parse(), Ok(CalloutKind::Tip));
        assert_eq!("warning".parse(), Ok(CalloutKind::Warning));
        assert_eq!("note".parse(), Ok(CalloutKind::Note));
        assert!("Tip".parse::<CalloutKind>().is_err());
        assert_eq!(CalloutKind::default(), CalloutKind::Note);
    }

    #[test]
    fn test_text_content_nested() {
        let nodes = vec![
            Node::Text("What is ".into()),
            Node::Element(Element::new("code", vec![], vec![Node::Text("select".into())])),
            Node::Text("?".into()),
        ];
        assert_eq!(text_content(&nodes), "What is select?");
    }

    #[test]
    fn test_element_attr() {
        let el = Element::new("a", vec![("href".into(), "/x".into())], vec![]);
        assert_eq!(el.attr("href"), Some("/x"));
        assert_eq!(el.attr("title"), None);
    }
}
