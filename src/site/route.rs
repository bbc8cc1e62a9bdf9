//! Request path routing and page resolution.
//!
//! Every resolution reads from disk again. A category must be in the static
//! [`Catalog`] before the content directory is consulted, so articles sitting
//! in an unconfigured directory are unreachable.

use percent_encoding::percent_decode_str;
use thiserror::Error;

use super::category::{Catalog, CategoryMeta};
use crate::compiler::{self, CompileError, Document};
use crate::content::{Article, ArticleMeta, ContentStore};
use crate::toc::{self, HeadingEntry};

/// A parsed site path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category(String),
    Article { category: String, slug: String },
}

impl Route {
    /// Parse a URL path (no query string). Empty segments are ignored, so
    /// `/golang/` and `/golang` are the same route.
    ///
    /// Returns `None` for paths that can never name a page.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments = Vec::new();
        for raw in path.split('/').filter(|s| !s.is_empty()) {
            let decoded = percent_decode_str(raw).decode_utf8().ok()?;
            segments.push(decoded.into_owned());
        }

        // Static output links to `<dir>/index.html`.
        if segments.last().is_some_and(|s| s == "index.html") {
            segments.pop();
        }

        let mut segments = segments.into_iter();
        let route = match (segments.next(), segments.next()) {
            (None, _) => Self::Home,
            (Some(category), None) => Self::Category(category),
            (Some(category), Some(slug)) => Self::Article { category, slug },
        };
        segments.next().is_none().then_some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Category(category) => format!("/{category}"),
            Self::Article { category, slug } => format!("/{category}/{slug}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no page at `{0}`")]
    NoRoute(String),

    #[error("unknown category `{0}`")]
    CategoryUnknown(String),

    #[error("article `{category}/{slug}` not found")]
    ArticleNotFound { category: String, slug: String },

    #[error("failed to compile `{category}/{slug}`")]
    Compile {
        category: String,
        slug: String,
        #[source]
        source: CompileError,
    },
}

impl ResolveError {
    /// Whether this renders the not-found page.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Self::Compile { .. })
    }
}

/// Everything a page template needs, fully loaded.
#[derive(Debug)]
pub enum Page<'a> {
    Home {
        categories: &'a Catalog,
    },
    Category {
        category: &'a CategoryMeta,
        articles: Vec<ArticleMeta>,
    },
    Article {
        category: &'a CategoryMeta,
        article: Article,
        document: Document,
        outline: Vec<HeadingEntry>,
    },
}

/// Resolve a route against the catalog and the content store.
pub fn resolve<'a>(
    route: &Route,
    catalog: &'a Catalog,
    store: &ContentStore,
) -> Result<Page<'a>, ResolveError> {
    match route {
        Route::Home => Ok(Page::Home {
            categories: catalog,
        }),
        Route::Category(slug) => {
            let category = lookup(catalog, slug)?;
            Ok(Page::Category {
                category,
                articles: store.list_articles(&category.slug),
            })
        }
        Route::Article { category, slug } => {
            let meta = lookup(catalog, category)?;
            let article =
                store
                    .get_article(category, slug)
                    .ok_or_else(|| ResolveError::ArticleNotFound {
                        category: category.clone(),
                        slug: slug.clone(),
                    })?;
            let document =
                compiler::compile(&article.body).map_err(|source| ResolveError::Compile {
                    category: category.clone(),
                    slug: slug.clone(),
                    source,
                })?;
            let outline = toc::extract(&article.body).collect();
            Ok(Page::Article {
                category: meta,
                article,
                document,
                outline,
            })
        }
    }
}

/// Parse and resolve in one step.
pub fn resolve_path<'a>(
    path: &str,
    catalog: &'a Catalog,
    store: &ContentStore,
) -> Result<Page<'a>, ResolveError> {
    let route = Route::parse(path).ok_or_else(|| ResolveError::NoRoute(path.to_string()))?;
    resolve(&route, catalog, store)
}

fn lookup<'a>(catalog: &'a Catalog, slug: &str) -> Result<&'a CategoryMeta, ResolveError> {
    catalog
        .get(slug)
        .ok_or_else(|| ResolveError::CategoryUnknown(slug.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        let golang = dir.path().join("golang");
        fs::create_dir_all(&golang).unwrap();
        fs::write(
            golang.join("goroutines-channels.mdx"),
            "---\ntitle: Goroutines & Channels\ndate: 2025-01-15\n---\n\n## What is a goroutine?\n\nCheap threads.\n",
        )
        .unwrap();
        fs::write(
            golang.join("broken.mdx"),
            "---\ntitle: Broken\n---\n\n<Callout type=\"tip\">\n\nnever closed\n",
        )
        .unwrap();
        let store = ContentStore::new(dir.path(), "mdx");
        (dir, store)
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(
            Route::parse("/golang/"),
            Some(Route::Category("golang".into()))
        );
        assert_eq!(
            Route::parse("/golang/gin-rest-api/index.html"),
            Some(Route::Article {
                category: "golang".into(),
                slug: "gin-rest-api".into()
            })
        );
        assert_eq!(
            Route::parse("/react/use%20state"),
            Some(Route::Article {
                category: "react".into(),
                slug: "use state".into()
            })
        );
        assert_eq!(Route::parse("/a/b/c"), None);
        assert_eq!(Route::parse("/%ff"), None);
    }

    #[test]
    fn test_route_path_roundtrip() {
        for path in ["/", "/golang", "/golang/gin-rest-api"] {
            assert_eq!(Route::parse(path).unwrap().path(), path);
        }
    }

    #[test]
    fn test_unknown_category() {
        let (_dir, store) = site();
        let catalog = Catalog::builtin();
        let err = resolve_path("/cobol", &catalog, &store).unwrap_err();
        assert!(matches!(err, ResolveError::CategoryUnknown(ref c) if c == "cobol"));
        assert!(err.is_not_found());

        let err = resolve_path("/cobol/hello", &catalog, &store).unwrap_err();
        assert!(matches!(err, ResolveError::CategoryUnknown(_)));
    }

    #[test]
    fn test_missing_article() {
        let (_dir, store) = site();
        let catalog = Catalog::builtin();
        let err = resolve_path("/golang/missing-slug", &catalog, &store).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::ArticleNotFound { ref category, ref slug }
                if category == "golang" && slug == "missing-slug"
        ));
    }

    #[test]
    fn test_article_resolves_with_outline() {
        let (_dir, store) = site();
        let catalog = Catalog::builtin();
        let page = resolve_path("/golang/goroutines-channels", &catalog, &store).unwrap();
        let Page::Article {
            article,
            document,
            outline,
            ..
        } = page
        else {
            panic!("expected an article page");
        };
        assert_eq!(article.meta.title, "Goroutines & Channels");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].id, "what-is-a-goroutine");
        assert_eq!(document.headings()[0].id, outline[0].id);
    }

    #[test]
    fn test_compile_error_is_not_not_found() {
        let (_dir, store) = site();
        let catalog = Catalog::builtin();
        let err = resolve_path("/golang/broken", &catalog, &store).unwrap_err();
        assert!(matches!(err, ResolveError::Compile { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_configured_category_without_content() {
        let (_dir, store) = site();
        let catalog = Catalog::builtin();
        let page = resolve_path("/react", &catalog, &store).unwrap();
        assert!(matches!(page, Page::Category { ref articles, .. } if articles.is_empty()));
    }
}
