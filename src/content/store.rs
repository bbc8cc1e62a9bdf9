//! Filesystem-backed article lookup.
//!
//! Layout: `<root>/<category>/<slug>.<ext>`. Every call re-reads the disk;
//! there is no cache. A missing root or unreadable directory yields empty
//! results, and a missing or unreadable file is simply not found.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::frontmatter;
use super::meta::{Article, ArticleMeta};
use crate::debug;
use crate::listing;

/// Read-only view of a content directory tree.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    extension: String,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of an article source file, or `None` for unsafe identifiers.
    pub fn article_path(&self, category: &str, slug: &str) -> Option<PathBuf> {
        if !is_safe_segment(category) || !is_safe_segment(slug) {
            return None;
        }
        Some(
            self.root
                .join(category)
                .join(format!("{slug}.{}", self.extension)),
        )
    }

    /// Load one article. Never errors: absence and I/O failure are both `None`.
    pub fn get_article(&self, category: &str, slug: &str) -> Option<Article> {
        let path = self.article_path(category, slug)?;
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!("content"; "cannot read {}: {}", path.display(), e);
                }
                return None;
            }
        };

        let extracted = frontmatter::extract(&source);
        if let Some(reason) = &extracted.fallback {
            debug!("content"; "{}: {}, using defaults", path.display(), reason);
        }

        Some(Article {
            meta: ArticleMeta::from_fields(category, slug, extracted.fields),
            body: extracted.body.to_string(),
        })
    }

    /// Every article identifier in a category, sorted by name.
    pub fn list_slugs(&self, category: &str) -> Vec<String> {
        if !is_safe_segment(category) {
            return Vec::new();
        }
        let Ok(entries) = fs::read_dir(self.root.join(category)) else {
            return Vec::new();
        };

        let mut slugs: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| self.slug_of(&entry.path()))
            .collect();
        slugs.sort_unstable();
        slugs
    }

    /// Metadata for every article in a category, newest first.
    pub fn list_articles(&self, category: &str) -> Vec<ArticleMeta> {
        let slugs = self.list_slugs(category);
        let mut articles: Vec<ArticleMeta> = slugs
            .par_iter()
            .filter_map(|slug| self.get_article(category, slug))
            .map(|article| article.meta)
            .collect();
        listing::sort_by_date(&mut articles);
        articles
    }

    /// Category directories holding at least one article, sorted by name.
    ///
    /// Independent of the configured category list.
    pub fn list_categories_with_content(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut categories: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_safe_segment(name) && !self.list_slugs(name).is_empty())
            .collect();
        categories.sort_unstable();
        categories
    }

    /// Slug of a file with the content extension.
    fn slug_of(&self, path: &Path) -> Option<String> {
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        is_safe_segment(stem).then(|| stem.to_string())
    }
}

/// A single, non-hidden path component.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_store() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "golang/goroutines-channels.mdx",
            "---\ntitle: Goroutines & Channels\ntags: [concurrency, goroutines, channels]\nreadTime: 6\ndate: 2025-01-15\n---\n## What is a goroutine?\n",
        );
        write(
            dir.path(),
            "golang/rest-apis-gin.mdx",
            "---\ntitle: REST APIs with Gin\ntags: [gin, rest, api, middleware]\nreadTime: 10\ndate: 2025-01-20\n---\nBody\n",
        );
        let store = ContentStore::new(dir.path(), "mdx");
        (dir, store)
    }

    #[test]
    fn test_get_article() {
        let (_dir, store) = sample_store();
        let article = store.get_article("golang", "goroutines-channels").unwrap();

        assert_eq!(article.meta.title, "Goroutines & Channels");
        assert_eq!(article.meta.category, "golang");
        assert_eq!(article.meta.slug, "goroutines-channels");
        assert_eq!(article.meta.read_time, 6);
        assert_eq!(article.meta.date, "2025-01-15");
        assert_eq!(article.body, "## What is a goroutine?\n");
    }

    #[test]
    fn test_get_missing_article() {
        let (_dir, store) = sample_store();
        assert!(store.get_article("golang", "missing").is_none());
        assert!(store.get_article("cobol", "anything").is_none());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let (dir, store) = sample_store();
        write(dir.path(), "secret.mdx", "---\ntitle: Secret\n---\n");
        assert!(store.get_article("golang", "../secret").is_none());
        assert!(store.get_article("..", "secret").is_none());
        assert!(store.article_path("golang", "").is_none());
    }

    #[test]
    fn test_header_less_file_defaults() {
        let (dir, store) = sample_store();
        write(dir.path(), "react/hooks.mdx", "## Hooks\n");
        let article = store.get_article("react", "hooks").unwrap();

        assert_eq!(article.meta, ArticleMeta::defaults("react", "hooks"));
        assert_eq!(article.body, "## Hooks\n");
    }

    #[test]
    fn test_folded_description_keeps_fields() {
        let (dir, store) = sample_store();
        write(
            dir.path(),
            "golang/x.mdx",
            "---\ntitle: Goroutines & Channels\ndescription: >\n  Lightweight threads in Go.\ntags: [go]\nreadTime: 6\n---\nBody\n",
        );
        let meta = store.get_article("golang", "x").unwrap().meta;

        assert_eq!(meta.title, "Goroutines & Channels");
        assert_eq!(meta.description, "Lightweight threads in Go.\n");
        assert_eq!(meta.tags, vec!["go"]);
        assert_eq!(meta.read_time, 6);
    }

    #[test]
    fn test_nested_map_lands_in_extra() {
        let (dir, store) = sample_store();
        write(
            dir.path(),
            "golang/x.mdx",
            "---\ntitle: Goroutines & Channels\nauthor:\n  name: Z\ntags: [go]\n---\nBody\n",
        );
        let meta = store.get_article("golang", "x").unwrap().meta;

        assert_eq!(meta.title, "Goroutines & Channels");
        assert_eq!(meta.tags, vec!["go"]);
        assert_eq!(meta.extra["author"]["name"], "Z");
    }

    #[test]
    fn test_empty_tags_without_read_time() {
        let (dir, store) = sample_store();
        write(dir.path(), "golang/x.mdx", "---\ntitle: X\ntags: []\n---\nBody\n");
        let meta = store.get_article("golang", "x").unwrap().meta;

        assert_eq!(meta.read_time, 1);
        assert!(meta.tags.is_empty());
        assert_eq!(meta.description, "");
        assert_eq!(meta.date, "");
    }

    #[test]
    fn test_list_slugs_filters_extension() {
        let (dir, store) = sample_store();
        write(dir.path(), "golang/notes.txt", "ignored");
        write(dir.path(), "golang/.draft.mdx", "ignored");
        fs::create_dir_all(dir.path().join("golang/assets.mdx")).unwrap();

        assert_eq!(
            store.list_slugs("golang"),
            vec!["goroutines-channels", "rest-apis-gin"]
        );
        assert!(store.list_slugs("cobol").is_empty());
    }

    #[test]
    fn test_list_articles_newest_first() {
        let (_dir, store) = sample_store();
        let slugs: Vec<_> = store
            .list_articles("golang")
            .into_iter()
            .map(|m| m.slug)
            .collect();
        assert_eq!(slugs, vec!["rest-apis-gin", "goroutines-channels"]);
    }

    #[test]
    fn test_list_categories_with_content() {
        let (dir, store) = sample_store();
        fs::create_dir_all(dir.path().join("typescript")).unwrap();
        write(dir.path(), "cobol/legacy.mdx", "## Old\n");
        write(dir.path(), "react/readme.txt", "not content");

        assert_eq!(store.list_categories_with_content(), vec!["cobol", "golang"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let store = ContentStore::new("/nonexistent/folio/content", "mdx");
        assert!(store.list_categories_with_content().is_empty());
        assert!(store.list_slugs("golang").is_empty());
        assert!(store.list_articles("golang").is_empty());
        assert!(store.get_article("golang", "x").is_none());
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "golang/a.md", "## A\n");
        write(dir.path(), "golang/b.mdx", "## B\n");
        let store = ContentStore::new(dir.path(), "md");
        assert_eq!(store.list_slugs("golang"), vec!["a"]);
    }
}
