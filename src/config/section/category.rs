//! `[[categories]]` validation.
//!
//! ```toml
//! [[categories]]
//! slug = "golang"
//! label = "Golang"
//! description = "Concurrency patterns and Go idioms."
//! icon = "go"
//! accent_color = "#81e6d9"
//! article_count = 2
//! last_updated = "2025-01-20"
//! ```
//!
//! Without any `[[categories]]` entry the built-in catalog is used.

use rustc_hash::FxHashSet;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::site::Catalog;
use crate::utils::date::DateTimeUtc;
use crate::utils::slug::{is_slug, slugify};

pub const SLUG: FieldPath = FieldPath::new("categories.slug");
pub const LABEL: FieldPath = FieldPath::new("categories.label");
pub const ACCENT_COLOR: FieldPath = FieldPath::new("categories.accent_color");
pub const LAST_UPDATED: FieldPath = FieldPath::new("categories.last_updated");

pub fn validate(catalog: &Catalog, diag: &mut ConfigDiagnostics) {
    if catalog.is_empty() {
        diag.warn(SLUG, "no categories configured, only the home page will render");
    }

    let mut seen = FxHashSet::default();
    for category in catalog {
        let slug = category.slug.as_str();
        if slug.is_empty() {
            diag.error(SLUG, "category slug must not be empty");
        } else if !is_slug(slug) {
            diag.error_with_hint(
                SLUG,
                format!("`{slug}` is not URL-safe"),
                format!("use \"{}\"", slugify(slug)),
            );
        } else if !seen.insert(slug) {
            diag.error(SLUG, format!("duplicate category `{slug}`"));
        }

        if category.label.trim().is_empty() {
            diag.error(LABEL, format!("category `{slug}` has an empty label"));
        }

        if !is_hex_color(&category.accent_color) {
            diag.error_with_hint(
                ACCENT_COLOR,
                format!(
                    "`{}` of category `{slug}` is not a hex color",
                    category.accent_color
                ),
                "use #rgb or #rrggbb",
            );
        }

        if !category.last_updated.is_empty() && DateTimeUtc::parse(&category.last_updated).is_none() {
            diag.warn(
                LAST_UPDATED,
                format!(
                    "`{}` of category `{slug}` is not a recognized date",
                    category.last_updated
                ),
            );
        }
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn diagnostics(extra: &str) -> ConfigDiagnostics {
        let config = test_parse_config(extra);
        let mut diag = ConfigDiagnostics::new();
        validate(&config.categories, &mut diag);
        diag
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#81e6d9"));
        assert!(!is_hex_color("81e6d9"));
        assert!(!is_hex_color("#81e6d"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn test_default_categories_are_valid() {
        let diag = diagnostics("");
        assert!(diag.is_empty());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_custom_categories_replace_builtin() {
        let config = test_parse_config(
            "[[categories]]\nslug = \"rust\"\nlabel = \"Rust\"\nicon = \"book\"\naccent_color = \"#f74c00\"",
        );
        assert_eq!(config.categories.len(), 1);
        assert!(config.categories.contains("rust"));
        assert!(!config.categories.contains("golang"));
    }

    #[test]
    fn test_category_errors() {
        let diag = diagnostics(
            r##"
[[categories]]
slug = "Go Lang"
label = "Go"

[[categories]]
slug = "react"
label = "React"
accent_color = "blue"

[[categories]]
slug = "react"
label = ""
"##,
        );
        // not URL-safe, bad color, duplicate slug, empty label
        assert_eq!(diag.len(), 4);
    }
}
