//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! content = "content"     # Content root, one directory per category
//! output = "public"       # Static output directory
//! extension = "mdx"       # Article file extension, without the dot
//! clean = false           # Remove output before building
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub content: PathBuf,
    pub output: PathBuf,
    pub extension: String,
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "public".into(),
            extension: "mdx".into(),
            clean: false,
        }
    }
}

impl BuildConfig {
    pub const EXTENSION: FieldPath = FieldPath::new("build.extension");
    pub const OUTPUT: FieldPath = FieldPath::new("build.output");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let ext = self.extension.as_str();
        if ext.is_empty() {
            diag.error_with_hint(Self::EXTENSION, "must not be empty", "use \"mdx\"");
        } else if ext.starts_with('.') {
            diag.error_with_hint(
                Self::EXTENSION,
                format!("`{ext}` starts with a dot"),
                format!("use \"{}\"", ext.trim_start_matches('.')),
            );
        } else if ext.contains(['/', '\\']) {
            diag.error(Self::EXTENSION, format!("`{ext}` contains a path separator"));
        }

        if self.output.as_os_str().is_empty() {
            diag.error(Self::OUTPUT, "must not be empty");
        }
    }
}
