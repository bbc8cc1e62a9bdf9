//! Front-matter extraction from YAML-style (`---`) or TOML (`+++`) headers.
//!
//! The header must open on the first line of the file. Parsing never fails
//! the caller: a broken header yields no fields plus a reason that callers log.
//!
//! ```text
//! ---
//! title: "Goroutines & Channels"
//! tags: [concurrency, "goroutines"]
//! aliases:
//!   - go-concurrency
//! readTime: 6   # minutes
//! ---
//! ```
//!
//! Nested maps and block scalars are kept as JSON values, so only the
//! fields that actually fail coercion fall back to their defaults.

use anyhow::{Result, anyhow, bail};
use serde_json::{Number, Value};
use serde_yaml::Value as YamlValue;

use super::meta::JsonMap;

/// Header syntax, chosen by the opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Result of splitting a content file.
#[derive(Debug)]
pub struct Extracted<'a> {
    /// Parsed header fields; empty when absent or malformed.
    pub fields: JsonMap,
    /// Body text following the header.
    pub body: &'a str,
    /// Why the header was discarded, if it was.
    pub fallback: Option<String>,
}

/// Split a file into header fields and body.
pub fn extract(content: &str) -> Extracted<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some((format, header_start)) = detect(content) else {
        return Extracted {
            fields: JsonMap::new(),
            body: content,
            fallback: None,
        };
    };

    let rest = &content[header_start..];
    let Some((header, body)) = split_closing(rest, format.delimiter()) else {
        return Extracted {
            fields: JsonMap::new(),
            body: rest,
            fallback: Some("unterminated front-matter block".to_string()),
        };
    };

    let parsed = match format {
        Format::Yaml => parse_yaml(header),
        Format::Toml => parse_toml(header),
    };

    match parsed {
        Ok(fields) => Extracted {
            fields,
            body,
            fallback: None,
        },
        Err(e) => Extracted {
            fields: JsonMap::new(),
            body,
            fallback: Some(e.to_string()),
        },
    }
}

/// Detect the opening delimiter line, returning the header's start offset.
fn detect(content: &str) -> Option<(Format, usize)> {
    let (first, consumed) = match content.find('\n') {
        Some(i) => (&content[..i], i + 1),
        None => (content, content.len()),
    };

    match first.trim_end() {
        "---" => Some((Format::Yaml, consumed)),
        "+++" => Some((Format::Toml, consumed)),
        _ => None,
    }
}

/// Find the closing delimiter line. Returns `(header, body)`.
fn split_closing<'a>(rest: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

// ============================================================================
// TOML
// ============================================================================

fn parse_toml(header: &str) -> Result<JsonMap> {
    let table: toml::Table =
        toml::from_str(header).map_err(|e| anyhow!("invalid TOML front-matter: {}", e.message()))?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

// ============================================================================
// YAML
// ============================================================================

fn parse_yaml(header: &str) -> Result<JsonMap> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(header).map_err(|e| anyhow!("invalid YAML front-matter: {e}"))?;

    match value {
        YamlValue::Null => Ok(JsonMap::new()),
        YamlValue::Mapping(mapping) => Ok(mapping_to_json(mapping)),
        _ => bail!("front-matter is not a `key: value` mapping"),
    }
}

/// Keys that are not scalars are dropped.
fn mapping_to_json(mapping: serde_yaml::Mapping) -> JsonMap {
    mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let key = match key {
                YamlValue::String(s) => s,
                YamlValue::Number(n) => n.to_string(),
                YamlValue::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, yaml_to_json(value)))
        })
        .collect()
}

fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => Value::Object(mapping_to_json(mapping)),
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}
