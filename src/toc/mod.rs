//! Outline extraction from raw article bodies.
//!
//! A line scan, independent of the compiler: `## text` is level 2 and
//! `### text` is level 3. Ids come from [`slugify`], the same function the
//! compiler uses, so outline links land on the rendered headings.
//!
//! Known limitations, kept on purpose to match the line contract:
//! - heading-like lines inside fenced code blocks are still picked up
//! - two headings with the same text share an id

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::utils::slug::slugify;

static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^##\s+(.+)").unwrap());
static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^###\s+(.+)").unwrap());

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

impl HeadingEntry {
    pub fn new(text: &str, level: u8) -> Self {
        Self {
            id: slugify(text),
            text: text.to_string(),
            level,
        }
    }
}

/// Lazy outline iterator. Clone it to restart from the beginning.
#[derive(Debug, Clone)]
pub struct Headings<'a> {
    lines: std::str::Lines<'a>,
}

impl Iterator for Headings<'_> {
    type Item = HeadingEntry;

    fn next(&mut self) -> Option<HeadingEntry> {
        self.lines.by_ref().find_map(parse_line)
    }
}

/// Outline of a body, in document order.
pub fn extract(body: &str) -> Headings<'_> {
    Headings {
        lines: body.lines(),
    }
}

/// Classify one line. `^##\s` only matches when the third character is
/// whitespace, so `###` lines never double-count as level 2.
fn parse_line(line: &str) -> Option<HeadingEntry> {
    let (caps, level) = if let Some(caps) = H3.captures(line) {
        (caps, 3)
    } else {
        (H2.captures(line)?, 2)
    };

    let text = caps.get(1)?.as_str().trim();
    if text.is_empty() {
        return None;
    }
    Some(HeadingEntry::new(text, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "\
Intro paragraph.

## What is a goroutine?

Text.

## Channels

### Buffered channels

## The select statement

#### Too deep
# Title
##NoSpace
## Common patterns
";

    #[test]
    fn test_extract_outline() {
        let outline: Vec<_> = extract(BODY).collect();
        let expected = vec![
            HeadingEntry::new("What is a goroutine?", 2),
            HeadingEntry::new("Channels", 2),
            HeadingEntry::new("Buffered channels", 3),
            HeadingEntry::new("The select statement", 2),
            HeadingEntry::new("Common patterns", 2),
        ];
        assert_eq!(outline, expected);
        assert_eq!(outline[0].id, "what-is-a-goroutine");
        assert_eq!(outline[2].id, "buffered-channels");
    }

    #[test]
    fn test_text_trimmed() {
        let entry = extract("##    Spaced out   ").next().unwrap();
        assert_eq!(entry.text, "Spaced out");
        assert_eq!(entry.id, "spaced-out");
    }

    #[test]
    fn test_restartable() {
        let headings = extract(BODY);
        let first: Vec<_> = headings.clone().collect();
        let second: Vec<_> = headings.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_lines() {
        let outline: Vec<_> = extract("## One\r\n### Two\r\n").collect();
        assert_eq!(outline[0].text, "One");
        assert_eq!(outline[1].text, "Two");
        assert_eq!(outline[1].level, 3);
    }

    #[test]
    fn test_indented_heading_ignored() {
        assert_eq!(extract("  ## Indented").count(), 0);
    }

    #[test]
    fn test_duplicate_ids_not_deduplicated() {
        let outline: Vec<_> = extract("## Example\n\n## Example\n").collect();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].id, outline[1].id);
    }

    #[test]
    fn test_fenced_code_still_scanned() {
        let outline: Vec<_> = extract("```sh\n## not a heading\n```\n").collect();
        assert_eq!(outline.len(), 1);
    }

    #[test]
    fn test_whitespace_only_text_skipped() {
        assert_eq!(extract("##   \n###\t\n").count(), 0);
    }
}
