//! Page templates.
//!
//! Every page is a fragment of `<main>` wrapped into the embedded layout.
//! Theme and navigation state arrive through [`ThemeContext`]; nothing here
//! reads global state.

use std::fmt::Write as _;

use super::html::render_document;
use crate::compiler::Document;
use crate::config::SiteConfig;
use crate::content::{Article, ArticleMeta};
use crate::embed::page::{LAYOUT_HTML, LayoutVars};
use crate::site::{Catalog, CategoryMeta, Page, ResolveError, ThemeContext};
use crate::toc::HeadingEntry;
use crate::utils::html::escape;
use crate::utils::plural_count;

/// Renders pages for one request path.
pub struct Renderer<'a> {
    config: &'a SiteConfig,
    theme: ThemeContext<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a SiteConfig, theme: ThemeContext<'a>) -> Self {
        Self { config, theme }
    }

    pub fn page(&self, page: &Page<'_>) -> String {
        match page {
            Page::Home { categories } => self.home(categories),
            Page::Category { category, articles } => self.category(category, articles),
            Page::Article {
                category,
                article,
                document,
                outline,
            } => self.article(category, article, document, outline),
        }
    }

    /// Page for a failed resolution: not-found, or the compile error page.
    pub fn error(&self, err: &ResolveError) -> String {
        match err {
            ResolveError::Compile {
                category,
                slug,
                source,
            } => self.compile_error(category, slug, &source.to_string()),
            _ => self.not_found(),
        }
    }

    pub fn not_found(&self) -> String {
        let main = String::from(
            r#"<section class="status"><h1>Note not found</h1><p>There is nothing at this address.</p><p><a href="/">← Back to the library</a></p></section>"#,
        );
        self.layout("Not found", &self.config.site.description, main)
    }

    fn compile_error(&self, category: &str, slug: &str, message: &str) -> String {
        let mut main = String::new();
        let _ = write!(
            main,
            r#"<section class="status"><h1>This note failed to compile</h1><pre class="compile-error">{}/{}: {}</pre><p><a href="/{}">← Back</a></p></section>"#,
            escape(category),
            escape(slug),
            escape(message),
            escape(category),
        );
        self.layout("Compile error", &self.config.site.description, main)
    }

    fn home(&self, categories: &Catalog) -> String {
        let site = &self.config.site;
        let mut main = String::new();
        let _ = write!(
            main,
            r#"<section class="hero"><h1>{}</h1><p>{}</p><hr class="divider"></section>"#,
            escape(&site.title),
            escape(&site.description)
        );

        main.push_str(r#"<section aria-labelledby="categories-heading"><h2 id="categories-heading" class="section-label">Topics</h2><div class="category-grid">"#);
        for category in categories {
            let _ = write!(
                main,
                r#"<a class="category-card" href="{}" style="{}"><div class="top"><span class="icon-badge">{}</span>"#,
                escape(&category.url()),
                category.accent_style(),
                category.icon.render(20)
            );
            if category.article_count > 0 {
                let _ = write!(
                    main,
                    r#"<span class="count">{}</span>"#,
                    plural_count(category.article_count as usize, "note")
                );
            }
            let _ = write!(
                main,
                r#"</div><h2>{}</h2><p>{}</p><span class="more">Browse notes →</span></a>"#,
                escape(&category.label),
                escape(&category.description)
            );
        }
        main.push_str("</div></section>");

        self.layout(&site.title, &site.description, main)
    }

    fn category(&self, category: &CategoryMeta, articles: &[ArticleMeta]) -> String {
        let mut main = String::new();
        let _ = write!(
            main,
            r#"<div style="{}"><nav class="breadcrumb" aria-label="Breadcrumb"><a href="/">library</a><span class="sep">/</span><span class="current">{}</span></nav>"#,
            category.accent_style(),
            escape(&category.label)
        );
        let _ = write!(
            main,
            r#"<section class="category-intro"><div class="category-title"><span class="icon-badge">{}</span><h1>{}</h1></div><p>{}</p><hr class="divider"></section>"#,
            category.icon.render(18),
            escape(&category.label),
            escape(&category.description)
        );

        let _ = write!(
            main,
            r#"<section><div class="listing-head"><h2 class="section-label">Notes · <span data-count>{}</span></h2>"#,
            articles.len()
        );
        if !articles.is_empty() {
            main.push_str(r#"<input class="search" type="search" placeholder="Search..." aria-label="Search notes" data-search>"#);
        }
        main.push_str("</div>");

        if articles.is_empty() {
            main.push_str(r#"<p class="empty">Notes coming soon.</p>"#);
        } else {
            main.push_str(r#"<ul class="article-list">"#);
            for article in articles {
                write_article_row(&mut main, article);
            }
            main.push_str(r#"</ul><p class="empty" data-no-match hidden>No notes match your search.</p>"#);
        }
        main.push_str("</section></div>");

        self.layout(&category.label, &category.description, main)
    }

    fn article(
        &self,
        category: &CategoryMeta,
        article: &Article,
        document: &Document,
        outline: &[HeadingEntry],
    ) -> String {
        let meta = &article.meta;
        let mut main = String::new();
        let _ = write!(
            main,
            r#"<div style="{}"><nav class="breadcrumb" aria-label="Breadcrumb"><a href="/">library</a><span class="sep">&gt;</span><a href="{}">{}</a><span class="sep">&gt;</span><span class="current">{}</span></nav>"#,
            category.accent_style(),
            escape(&category.url()),
            escape(&category.label),
            escape(&meta.title)
        );

        main.push_str(r#"<div class="article-layout"><article><header class="article-header">"#);
        let _ = write!(
            main,
            r#"<h1>{}</h1><p class="description">{}</p><div class="meta-line"><span>{} min read</span>"#,
            escape(&meta.title),
            escape(&meta.description),
            meta.read_time
        );
        if !meta.date.is_empty() {
            main.push_str("<span>·</span>");
            write_date(&mut main, meta);
        }
        if !meta.tags.is_empty() {
            main.push_str("<span>·</span>");
            write_tags(&mut main, &meta.tags);
        }
        main.push_str(r#"</div><hr class="divider"></header><div class="prose">"#);
        main.push_str(&render_document(document));
        main.push_str("</div></article>");

        if !outline.is_empty() {
            write_outline(&mut main, outline);
        }

        let _ = write!(
            main,
            r#"</div><a class="back-link" href="{}">← Back to {}</a></div>"#,
            escape(&category.url()),
            escape(&category.label)
        );

        self.layout(&meta.title, &meta.description, main)
    }

    // ========================================================================
    // shell
    // ========================================================================

    fn layout(&self, title: &str, description: &str, main: String) -> String {
        let site = &self.config.site;
        let full_title = if title == site.title || site.title.is_empty() {
            title.to_string()
        } else {
            format!("{title} · {}", site.title)
        };

        let mut head = String::new();
        if let Some(base) = site.base_url() {
            let path = if self.theme.current_path == "/" {
                ""
            } else {
                self.theme.current_path
            };
            let _ = write!(
                head,
                r#"<link rel="canonical" href="{}">"#,
                escape(&format!("{base}{path}"))
            );
        }
        if !site.author.is_empty() {
            let _ = write!(head, r#"<meta name="author" content="{}">"#, escape(&site.author));
        }

        LAYOUT_HTML.render(&LayoutVars {
            title: escape(&full_title).into_owned(),
            description: escape(description).into_owned(),
            head,
            html_class: self.theme.default.html_class(),
            theme_script: self.theme_script(),
            header: self.header(),
            main,
            footer: self.footer(),
        })
    }

    /// Applies the stored or system theme before first paint.
    fn theme_script(&self) -> String {
        let json = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".into());
        format!(
            r#"(function(){{var t=null;try{{t=localStorage.getItem({key})}}catch(e){{}}var d={default};if(t!=="dark"&&t!=="light"){{t=d==="system"?(window.matchMedia&&matchMedia("(prefers-color-scheme: dark)").matches?"dark":"light"):d}}document.documentElement.classList.toggle("dark",t==="dark")}})();"#,
            key = json(self.theme.storage_key),
            default = json(self.theme.default.as_str()),
        )
    }

    fn header(&self) -> String {
        let mut out = String::from(
            r#"<header class="site-header"><div class="inner"><a class="brand" href="/" aria-label="Library home">"#,
        );
        out.push_str(&escape(&self.config.site.title));
        out.push_str(r#"</a><nav class="site-nav" aria-label="Main navigation">"#);
        for category in &self.config.categories {
            let href = category.url();
            let current = if self.theme.is_active(&href) {
                r#" aria-current="page""#
            } else {
                ""
            };
            let _ = write!(
                out,
                r#"<a href="{}"{current}>{}</a>"#,
                escape(&href),
                escape(&category.label)
            );
        }
        out.push_str(r#"</nav><button type="button" class="theme-toggle" data-theme-toggle aria-label="Toggle theme"><span class="icon-light">☀</span><span class="icon-dark">☾</span></button></div></header>"#);
        out
    }

    fn footer(&self) -> String {
        let author = &self.config.site.author;
        if author.is_empty() {
            r#"<footer class="site-footer">Updated as I learn</footer>"#.to_string()
        } else {
            format!(
                r#"<footer class="site-footer">Updated as I learn · Built by {}</footer>"#,
                escape(author)
            )
        }
    }
}

fn write_article_row(out: &mut String, article: &ArticleMeta) {
    let tags = serde_json::to_string(&article.tags).unwrap_or_else(|_| "[]".into());
    let _ = write!(
        out,
        r#"<li class="article-row" data-article data-title="{}" data-tags="{}"><a href="{}"><h3>{}</h3><p>{}</p><div class="meta-line"><span>{} min read</span>"#,
        escape(&article.title),
        escape(&tags),
        escape(&article.url()),
        escape(&article.title),
        escape(&article.description),
        article.read_time
    );
    if !article.tags.is_empty() {
        out.push_str("<span>·</span>");
        write_tags(out, &article.tags);
    }
    out.push_str("</div></a></li>");
}

fn write_tags(out: &mut String, tags: &[String]) {
    out.push_str(r#"<ul class="tags">"#);
    for tag in tags {
        let _ = write!(out, r#"<li class="tag">{}</li>"#, escape(tag));
    }
    out.push_str("</ul>");
}

fn write_date(out: &mut String, meta: &ArticleMeta) {
    match meta.parsed_date() {
        Some(date) => {
            let _ = write!(
                out,
                r#"<time datetime="{}">{}</time>"#,
                date.to_rfc3339(),
                date.to_display()
            );
        }
        None => {
            let _ = write!(out, "<span>{}</span>", escape(&meta.date));
        }
    }
}

fn write_outline(out: &mut String, outline: &[HeadingEntry]) {
    out.push_str(r#"<aside class="toc"><nav data-toc aria-label="Table of contents"><p class="section-label">On this page</p><ul>"#);
    for entry in outline {
        let _ = write!(
            out,
            r##"<li class="level-{}"><a href="#{}" data-toc-id="{}">{}</a></li>"##,
            entry.level,
            escape(&entry.id),
            escape(&entry.id),
            escape(&entry.text)
        );
    }
    out.push_str("</ul></nav></aside>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;
    use crate::site::{ThemePreference, resolve_path};
    use std::fs;
    use tempfile::TempDir;

    fn render(path: &str, store: &ContentStore) -> Result<String, String> {
        let config = SiteConfig::default();
        let theme = ThemeContext::new(ThemePreference::System, &config.theme.storage_key, path);
        let renderer = Renderer::new(&config, theme);
        match resolve_path(path, &config.categories, store) {
            Ok(page) => Ok(renderer.page(&page)),
            Err(err) => Err(renderer.error(&err)),
        }
    }

    fn golang_store() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        let golang = dir.path().join("golang");
        fs::create_dir_all(&golang).unwrap();
        fs::write(
            golang.join("goroutines-channels.mdx"),
            "---\ntitle: Goroutines & Channels\ntags: [concurrency, channels]\nreadTime: 6\ndate: 2025-01-15\n---\n\n## What is a goroutine?\n\nText.\n\n### Buffered channels\n\nMore.\n",
        )
        .unwrap();
        fs::write(
            golang.join("gin-rest-api.mdx"),
            "---\ntitle: REST APIs with Gin\ntags: [gin, api]\ndate: 2025-01-20\n---\n\nNo headings.\n",
        )
        .unwrap();
        fs::write(golang.join("broken.mdx"), "<Nope />\n").unwrap();
        let store = ContentStore::new(dir.path(), "mdx");
        (dir, store)
    }

    #[test]
    fn test_home_lists_catalog() {
        let (_dir, store) = golang_store();
        let html = render("/", &store).unwrap();
        for slug in ["unreal-engine", "golang", "dotnet", "react", "typescript"] {
            assert!(html.contains(&format!(r#"class="category-card" href="/{slug}""#)));
        }
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_category_rows_newest_first() {
        let (_dir, store) = golang_store();
        let html = render("/golang", &store).unwrap();
        let gin = html.find(r#"data-title="REST APIs with Gin""#).unwrap();
        let chan = html.find(r#"data-title="Goroutines &amp; Channels""#).unwrap();
        assert!(gin < chan);
        assert!(html.contains(r#"data-tags="[&quot;gin&quot;,&quot;api&quot;]""#));
        assert!(html.contains("data-search"));
        assert!(html.contains(r#"href="/golang" aria-current="page""#));
    }

    #[test]
    fn test_empty_category() {
        let (_dir, store) = golang_store();
        let html = render("/react", &store).unwrap();
        assert!(html.contains("Notes coming soon."));
        assert!(!html.contains("data-search"));
    }

    #[test]
    fn test_article_outline_matches_anchors() {
        let (_dir, store) = golang_store();
        let html = render("/golang/goroutines-channels", &store).unwrap();
        assert!(html.contains(r#"<h2 id="what-is-a-goroutine" class="scroll-mt">"#));
        assert!(html.contains(r#"data-toc-id="what-is-a-goroutine""#));
        assert!(html.contains(r##"<li class="level-3"><a href="#buffered-channels""##));
        assert!(html.contains("6 min read"));
        assert!(html.contains(r#"<time datetime="2025-01-15T00:00:00Z">Jan 15, 2025</time>"#));
        assert!(html.contains("<title>Goroutines &amp; Channels · Library</title>"));
    }

    #[test]
    fn test_article_without_headings_has_no_toc() {
        let (_dir, store) = golang_store();
        let html = render("/golang/gin-rest-api", &store).unwrap();
        assert!(!html.contains("data-toc"));
    }

    #[test]
    fn test_not_found_pages() {
        let (_dir, store) = golang_store();
        for path in ["/cobol", "/golang/missing", "/a/b/c"] {
            let html = render(path, &store).unwrap_err();
            assert!(html.contains("Note not found"), "{path}");
        }
    }

    #[test]
    fn test_compile_error_page() {
        let (_dir, store) = golang_store();
        let html = render("/golang/broken", &store).unwrap_err();
        assert!(html.contains("failed to compile"));
        assert!(html.contains("line 1: unknown component &lt;Nope&gt;"));
    }

    #[test]
    fn test_theme_bootstrap_uses_storage_key() {
        let (_dir, store) = golang_store();
        let html = render("/", &store).unwrap();
        assert!(html.contains(r#"localStorage.getItem("library-preferred-theme")"#));
        assert!(html.contains(r#"<html lang="en" class="">"#));
    }
}
