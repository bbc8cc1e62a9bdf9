//! Theme preference and the context handed to page templates.
//!
//! The server never knows the visitor's stored choice. Pages carry the
//! configured default plus the storage key; the client script reads the key,
//! falls back to the system preference, and writes back on toggle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted client preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Follow `prefers-color-scheme`.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Value of the `class` attribute on `<html>` before the script runs.
    pub fn html_class(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light | Self::System => "",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything templates need to know about theming and navigation.
///
/// Built once per render and passed down explicitly.
#[derive(Debug, Clone, Copy)]
pub struct ThemeContext<'a> {
    pub default: ThemePreference,
    pub storage_key: &'a str,
    /// Path of the page being rendered, for highlighting navigation links.
    pub current_path: &'a str,
}

impl<'a> ThemeContext<'a> {
    pub fn new(default: ThemePreference, storage_key: &'a str, current_path: &'a str) -> Self {
        Self {
            default,
            storage_key,
            current_path,
        }
    }

    /// Whether a navigation link to `href` should be marked current.
    pub fn is_active(&self, href: &str) -> bool {
        self.current_path == href
            || (href != "/"
                && self
                    .current_path
                    .strip_prefix(href)
                    .is_some_and(|rest| rest.starts_with('/')))
    }
}
