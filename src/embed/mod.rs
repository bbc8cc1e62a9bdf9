//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `page` - The HTML shell every page is rendered into
//! - `assets` - Client script and stylesheet served under `/assets/`
//! - `init` - Files written by `folio init`
//!
//! # Usage
//!
//! ```ignore
//! use embed::assets::{FOLIO_JS, ScriptVars};
//!
//! let js = FOLIO_JS.render(&ScriptVars::from_config(&config));
//! ```

mod template;

pub use template::{Template, TemplateVars, substitute};

pub mod page {
    use super::{Template, TemplateVars, substitute};

    /// Variables for layout.html. Values are inserted verbatim, so callers
    /// pass already-escaped HTML.
    pub struct LayoutVars {
        pub title: String,
        pub description: String,
        pub head: String,
        pub html_class: &'static str,
        /// Inline theme bootstrap, runs before first paint.
        pub theme_script: String,
        pub header: String,
        pub main: String,
        pub footer: String,
    }

    impl TemplateVars for LayoutVars {
        fn apply(&self, content: &str) -> String {
            substitute(
                content,
                &[
                    ("__HTML_CLASS__", self.html_class),
                    ("__TITLE__", self.title.as_str()),
                    ("__DESCRIPTION__", self.description.as_str()),
                    ("__HEAD__", self.head.as_str()),
                    ("__THEME_SCRIPT__", self.theme_script.as_str()),
                    ("__HEADER__", self.header.as_str()),
                    ("__FOOTER__", self.footer.as_str()),
                    ("__MAIN__", self.main.as_str()),
                ],
            )
        }
    }

    pub const LAYOUT_HTML: Template<LayoutVars> = Template::new(include_str!("page/layout.html"));
}

pub mod assets {
    use super::{Template, TemplateVars, substitute};
    use crate::config::SiteConfig;
    use crate::spy::ObserverOptions;

    pub const SCRIPT_PATH: &str = "/assets/folio.js";
    pub const STYLE_PATH: &str = "/assets/folio.css";

    /// Variables for folio.js.
    pub struct ScriptVars {
        pub observer: ObserverOptions,
        pub storage_key: String,
    }

    impl ScriptVars {
        pub fn from_config(config: &SiteConfig) -> Self {
            Self {
                observer: ObserverOptions::default(),
                storage_key: config.theme.storage_key.clone(),
            }
        }
    }

    impl TemplateVars for ScriptVars {
        fn apply(&self, content: &str) -> String {
            let json = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".into());
            substitute(
                content,
                &[
                    ("__FOLIO_ROOT_MARGIN__", json(&self.observer.root_margin()).as_str()),
                    ("__FOLIO_THRESHOLD__", self.observer.threshold.to_string().as_str()),
                    ("__FOLIO_STORAGE_KEY__", json(&self.storage_key).as_str()),
                ],
            )
        }
    }

    /// Scroll spy, search filter, copy buttons and theme toggle.
    pub const FOLIO_JS: Template<ScriptVars> = Template::new(include_str!("assets/folio.js"));

    pub const FOLIO_CSS: &str = include_str!("assets/folio.css");

    /// Embedded asset for a request path, as `(content type, body)`.
    pub fn lookup(path: &str, config: &SiteConfig) -> Option<(&'static str, String)> {
        match path {
            SCRIPT_PATH => Some((
                crate::utils::mime::types::JAVASCRIPT,
                FOLIO_JS.render(&ScriptVars::from_config(config)),
            )),
            STYLE_PATH => Some((crate::utils::mime::types::CSS, FOLIO_CSS.to_string())),
            _ => None,
        }
    }
}

pub mod init {
    /// Category directory and slug of the scaffolded article.
    pub const SAMPLE_CATEGORY: &str = "golang";
    pub const SAMPLE_SLUG: &str = "goroutines-channels";

    pub const SAMPLE_ARTICLE: &str = include_str!("init/goroutines-channels.mdx");
}
