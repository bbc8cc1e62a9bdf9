//! Body compile failures.

use thiserror::Error;

/// A compile failure with the 1-based body line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct CompileError {
    pub line: usize,
    pub kind: CompileErrorKind,
}

impl CompileError {
    pub fn new(line: usize, kind: CompileErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    #[error("unknown component <{0}>")]
    UnknownComponent(String),

    #[error("<{0}> is never closed")]
    Unclosed(String),

    #[error("closing tag </{0}> has no matching opening tag")]
    UnmatchedClose(String),

    #[error("expected </{expected}> but found </{found}>")]
    MismatchedClose { expected: String, found: String },

    #[error("invalid Callout type \"{0}\" (expected one of: tip, warning, note)")]
    InvalidCalloutType(String),

    #[error("<{component}> requires a non-empty `{attribute}` attribute")]
    MissingAttribute {
        component: &'static str,
        attribute: &'static str,
    },

    #[error("malformed tag: {0}")]
    MalformedTag(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line() {
        let err = CompileError::new(7, CompileErrorKind::Unclosed("Callout".into()));
        assert_eq!(err.to_string(), "line 7: <Callout> is never closed");
    }

    #[test]
    fn test_missing_attribute_message() {
        let kind = CompileErrorKind::MissingAttribute {
            component: "YouTube",
            attribute: "id",
        };
        assert_eq!(
            kind.to_string(),
            "<YouTube> requires a non-empty `id` attribute"
        );
    }
}
