//! `[theme]` section configuration.
//!
//! ```toml
//! [theme]
//! default = "system"                      # system | light | dark
//! storage_key = "library-preferred-theme" # localStorage key for the toggle
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::site::ThemePreference;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub default: ThemePreference,
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: ThemePreference::System,
            storage_key: "library-preferred-theme".into(),
        }
    }
}

impl ThemeConfig {
    pub const STORAGE_KEY: FieldPath = FieldPath::new("theme.storage_key");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let key = self.storage_key.as_str();
        if key.is_empty() {
            diag.error(Self::STORAGE_KEY, "must not be empty");
        } else if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            diag.error_with_hint(
                Self::STORAGE_KEY,
                format!("`{key}` contains unsupported characters"),
                "use letters, digits, `-`, `_` or `.`",
            );
        }
    }
}
