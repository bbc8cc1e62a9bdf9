//! Static category catalog.
//!
//! Categories come from `[[categories]]` in `folio.toml`, not from the content
//! directory. `article_count` and `last_updated` are declared there as well and
//! are never reconciled with what is on disk.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::utils::html::escape;

/// Icon shown next to a category label.
///
/// A closed set: each variant renders its own inline SVG, so an unknown icon
/// name is a config parse error rather than a missing image at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryIcon {
    #[serde(alias = "SiUnrealengine")]
    UnrealEngine,
    #[serde(alias = "SiGo")]
    Go,
    #[serde(alias = "SiDotnet")]
    Dotnet,
    #[serde(alias = "SiReact")]
    React,
    #[serde(alias = "SiTypescript")]
    Typescript,
    #[default]
    Book,
}

impl CategoryIcon {
    /// Inline SVG drawn with `currentColor`, so the surrounding accent applies.
    pub fn render(self, size: u32) -> String {
        let mut svg = format!(
            r#"<svg class="category-icon" width="{size}" height="{size}" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.8" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">"#
        );
        svg.push_str(self.shape());
        svg.push_str("</svg>");
        svg
    }

    fn shape(self) -> &'static str {
        match self {
            Self::UnrealEngine => {
                r#"<circle cx="12" cy="12" r="10"/><path d="M9 7v7a3 3 0 0 0 6 0V7"/><path d="M15 7v10"/>"#
            }
            Self::Go => {
                r#"<path d="M3 9h5M2 12h4M3 15h5"/><path d="M16 9a3 3 0 1 0 0 6h2v-3h-2"/><circle cx="20" cy="12" r="0.5"/>"#
            }
            Self::Dotnet => {
                r#"<circle cx="4" cy="16" r="1"/><path d="M8 16V8l6 8V8"/><path d="M21 8h-4v8h4M17 12h3"/>"#
            }
            Self::React => {
                r#"<circle cx="12" cy="12" r="1.5"/><ellipse cx="12" cy="12" rx="10" ry="4"/><ellipse cx="12" cy="12" rx="10" ry="4" transform="rotate(60 12 12)"/><ellipse cx="12" cy="12" rx="10" ry="4" transform="rotate(120 12 12)"/>"#
            }
            Self::Typescript => {
                r#"<rect x="3" y="3" width="18" height="18" rx="2"/><path d="M7 11h6M10 11v7"/><path d="M18 11.5a2 2 0 0 0-3.5 1c0 2 3.5 1.5 3.5 3.5a2 2 0 0 1-3.5 1"/>"#
            }
            Self::Book => {
                r#"<path d="M4 19.5A2.5 2.5 0 0 1 6.5 17H20"/><path d="M6.5 2H20v20H6.5A2.5 2.5 0 0 1 4 19.5v-15A2.5 2.5 0 0 1 6.5 2z"/>"#
            }
        }
    }
}

/// One configured category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMeta {
    pub slug: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: CategoryIcon,
    #[serde(default = "default_accent")]
    pub accent_color: String,
    #[serde(default)]
    pub article_count: u32,
    #[serde(default)]
    pub last_updated: String,
}

fn default_accent() -> String {
    "#81e6d9".into()
}

impl CategoryMeta {
    pub fn url(&self) -> String {
        format!("/{}", self.slug)
    }

    /// Accent color with a two-digit hex alpha appended (`#81e6d9` + `20`).
    ///
    /// Short `#rgb` colors are expanded first so the result stays valid CSS.
    pub fn accent_alpha(&self, alpha: &str) -> String {
        let hex = self.accent_color.trim_start_matches('#');
        let mut out = String::with_capacity(9);
        out.push('#');
        if hex.len() == 3 {
            for c in hex.chars() {
                let _ = write!(out, "{c}{c}");
            }
        } else {
            out.push_str(hex);
        }
        out.push_str(alpha);
        out
    }

    /// `style` attribute value setting the accent custom property.
    pub fn accent_style(&self) -> String {
        format!("--accent: {}", escape(&self.accent_color))
    }
}

/// Ordered list of configured categories.
///
/// Order is the configured order and drives the home grid and navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<CategoryMeta>);

impl Catalog {
    pub fn new(categories: Vec<CategoryMeta>) -> Self {
        Self(categories)
    }

    /// The five categories the site ships with.
    pub fn builtin() -> Self {
        let entry = |slug: &str, label: &str, description: &str, icon, accent: &str| CategoryMeta {
            slug: slug.into(),
            label: label.into(),
            description: description.into(),
            icon,
            accent_color: accent.into(),
            article_count: 0,
            last_updated: "2025-01-01".into(),
        };
        Self(vec![
            entry(
                "unreal-engine",
                "Unreal Engine",
                "Blueprints, C++ gameplay systems, rendering pipeline, and everything in between for building games with UE5.",
                CategoryIcon::UnrealEngine,
                "#ff63c3",
            ),
            entry(
                "golang",
                "Golang",
                "Concurrency patterns, REST APIs with Gin/Echo, database integrations, and Go idioms worth memorising.",
                CategoryIcon::Go,
                "#81e6d9",
            ),
            entry(
                "dotnet",
                ".NET",
                "ASP.NET Core, Entity Framework, CQRS patterns, background services, and the broader .NET ecosystem.",
                CategoryIcon::Dotnet,
                "#a78bfa",
            ),
            entry(
                "react",
                "React",
                "Hooks, performance optimisation, state management with Redux Toolkit, and modern React patterns.",
                CategoryIcon::React,
                "#60a5fa",
            ),
            entry(
                "typescript",
                "TypeScript",
                "Type utilities, generics, conditional types, declaration files, and making TypeScript work for you.",
                CategoryIcon::Typescript,
                "#fbbf24",
            ),
        ])
    }

    /// Exact, case-sensitive lookup by slug.
    pub fn get(&self, slug: &str) -> Option<&CategoryMeta> {
        self.0.iter().find(|c| c.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryMeta> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[CategoryMeta] {
        &self.0
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CategoryMeta;
    type IntoIter = std::slice::Iter<'a, CategoryMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
