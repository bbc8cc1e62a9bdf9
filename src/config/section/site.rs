//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! title = "Library"
//! description = "Personal knowledge base"
//! author = "me"
//! url = "https://library.example.com"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Site metadata used in page titles and the `<head>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Public URL, only used for `<link rel="canonical">`.
    pub url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Library".into(),
            description: "A curated collection of notes, patterns, and reference material.".into(),
            author: String::new(),
            url: None,
        }
    }
}

impl SiteConfig {
    pub const TITLE: FieldPath = FieldPath::new("site.title");
    pub const URL: FieldPath = FieldPath::new("site.url");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.warn(Self::TITLE, "empty title, pages will only show the article name");
        }
        if let Some(url) = &self.url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            diag.error_with_hint(
                Self::URL,
                format!("`{url}` is not an http(s) URL"),
                "use format like https://example.com",
            );
        }
    }

    /// Site URL without a trailing slash.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|u| u.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_site_config() {
        let config = test_parse_config(
            "[site]\ntitle = \"Notes\"\nurl = \"https://notes.example.com/\"",
        );
        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.site.base_url(), Some("https://notes.example.com"));
    }

    #[test]
    fn test_site_url_scheme() {
        let config = test_parse_config("[site]\nurl = \"ftp://example.com\"");
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
