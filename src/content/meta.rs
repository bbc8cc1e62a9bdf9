//! Article metadata coerced from front-matter fields.

use serde::Serialize;
use serde_json::Value;

use crate::utils::date::DateTimeUtc;

/// Raw front-matter fields, key order preserved.
pub type JsonMap = serde_json::Map<String, Value>;

/// Reading time used when the header omits or garbles `readTime`.
pub const DEFAULT_READ_TIME: u32 = 1;

/// Article metadata.
///
/// Identity is `(category, slug)`. Every field is coerced on its own, so one
/// malformed value never discards the others.
///
/// | Field         | Source key    | Default  |
/// |---------------|---------------|----------|
/// | `title`       | `title`       | slug     |
/// | `description` | `description` | `""`     |
/// | `tags`        | `tags`        | `[]`     |
/// | `read_time`   | `readTime`    | `1`      |
/// | `date`        | `date`        | `""`     |
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMeta {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub read_time: u32,
    /// Literal string form of whatever scalar the header held.
    pub date: String,
    /// Header keys with no dedicated field.
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    pub extra: JsonMap,
}

/// Metadata plus the body text both the compiler and the outline read.
#[derive(Debug, Clone)]
pub struct Article {
    pub meta: ArticleMeta,
    pub body: String,
}

impl ArticleMeta {
    /// Metadata for a file with no usable header.
    pub fn defaults(category: &str, slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            category: category.to_string(),
            tags: Vec::new(),
            read_time: DEFAULT_READ_TIME,
            date: String::new(),
            extra: JsonMap::new(),
        }
    }

    /// Coerce raw header fields, falling back per field.
    pub fn from_fields(category: &str, slug: &str, mut fields: JsonMap) -> Self {
        let mut meta = Self::defaults(category, slug);

        if let Some(title) = fields.remove("title").and_then(non_empty_string) {
            meta.title = title;
        }
        if let Some(description) = fields.remove("description").and_then(non_empty_string) {
            meta.description = description;
        }
        if let Some(tags) = fields.remove("tags").and_then(string_list) {
            meta.tags = tags;
        }
        if let Some(read_time) = fields.remove("readTime").and_then(positive_int) {
            meta.read_time = read_time;
        }
        if let Some(date) = fields.remove("date").and_then(scalar_string) {
            meta.date = date;
        }

        meta.extra = fields;
        meta
    }

    /// Parsed `date`, when it is in a recognized form.
    pub fn parsed_date(&self) -> Option<DateTimeUtc> {
        DateTimeUtc::parse(&self.date)
    }

    /// Date for display: `Jan 15, 2025` when parsable, the literal otherwise.
    pub fn display_date(&self) -> String {
        self.parsed_date()
            .map_or_else(|| self.date.clone(), DateTimeUtc::to_display)
    }

    /// Site-relative URL of the article page.
    pub fn url(&self) -> String {
        format!("/{}/{}", self.category, self.slug)
    }
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// A sequence of strings, or a comma-separated scalar.
fn string_list(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn positive_int(value: Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n > 0).then_some(n)
}

fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
