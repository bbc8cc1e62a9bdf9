//! Static site build.
//!
//! Build pipeline phases:
//! - **Init** - Clean (with `--clean`) and create the output directory
//! - **Collect** - Home, every configured category, every article in them
//! - **Render** - Parallel resolve + render + write, aborting on the first error
//! - **Finalize** - `404.html` and the embedded assets

use crate::{
    config::SiteConfig,
    content::ContentStore,
    embed::assets,
    log,
    logger::ProgressLine,
    render::Renderer,
    site::{ResolveError, Route, ThemeContext, resolve},
    utils::plural_count,
};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub categories: usize,
    pub articles: usize,
}

impl BuildStats {
    /// Every written page, home included.
    pub fn pages(&self) -> usize {
        1 + self.categories + self.articles
    }
}

/// Render every route to `<output>/<route>/index.html`.
pub fn build_site(config: &SiteConfig, quiet: bool) -> Result<BuildStats> {
    let started = Instant::now();
    let output = config.output_dir();
    init_output(&output, config.build.clean)?;

    let store = config.store();
    warn_unconfigured(config, &store);

    let routes = collect_routes(config, &store);
    let stats = BuildStats {
        categories: config.categories.len(),
        articles: routes.len() - 1 - config.categories.len(),
    };

    let progress = (!quiet).then(|| ProgressLine::new(&[("pages", routes.len())]));

    let result = routes.par_iter().try_for_each(|route| {
        let html = render_route(config, &store, route)?;
        write_file(&output_path(&output, route), &html)?;
        if let Some(p) = &progress {
            p.inc("pages");
        }
        Ok::<_, anyhow::Error>(())
    });

    if let Some(p) = progress {
        p.finish();
    }
    result?;

    finalize(config, &output)?;

    if !quiet {
        log!(
            "build";
            "rendered {} ({}) in {}ms",
            plural_count(stats.pages(), "page"),
            plural_count(stats.articles, "article"),
            started.elapsed().as_millis()
        );
    }
    Ok(stats)
}

fn init_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clean {}", output.display()))?;
    }
    fs::create_dir_all(output).with_context(|| format!("Failed to create {}", output.display()))
}

/// Content directories that no configured category points at.
fn warn_unconfigured(config: &SiteConfig, store: &ContentStore) {
    for dir in store.list_categories_with_content() {
        if !config.categories.contains(&dir) {
            log!(
                "warning";
                "skipping {}: `{}` is not a configured category",
                plural_count(store.list_slugs(&dir).len(), "article"),
                dir
            );
        }
    }
}

fn collect_routes(config: &SiteConfig, store: &ContentStore) -> Vec<Route> {
    let mut routes = vec![Route::Home];
    for category in &config.categories {
        routes.push(Route::Category(category.slug.clone()));
        routes.extend(
            store
                .list_slugs(&category.slug)
                .into_iter()
                .map(|slug| Route::Article {
                    category: category.slug.clone(),
                    slug,
                }),
        );
    }
    routes
}

fn render_route(config: &SiteConfig, store: &ContentStore, route: &Route) -> Result<String> {
    let path = route.path();
    let theme = ThemeContext::new(config.theme.default, &config.theme.storage_key, &path);
    let renderer = Renderer::new(config, theme);

    match resolve(route, &config.categories, store) {
        Ok(page) => Ok(renderer.page(&page)),
        Err(ResolveError::Compile {
            category,
            slug,
            source,
        }) => {
            let file = store
                .article_path(&category, &slug)
                .map(|p| config.root_relative(p))
                .unwrap_or_else(|| PathBuf::from(format!("{category}/{slug}")));
            Err(anyhow!("{}: {}", file.display(), source))
        }
        Err(err) => Err(anyhow!(err).context(format!("Failed to render {path}"))),
    }
}

/// `index.html` inside the route's directory.
fn output_path(output: &Path, route: &Route) -> PathBuf {
    match route {
        Route::Home => output.join("index.html"),
        Route::Category(category) => output.join(category).join("index.html"),
        Route::Article { category, slug } => output.join(category).join(slug).join("index.html"),
    }
}

fn finalize(config: &SiteConfig, output: &Path) -> Result<()> {
    let theme = ThemeContext::new(config.theme.default, &config.theme.storage_key, "");
    write_file(
        &output.join("404.html"),
        &Renderer::new(config, theme).not_found(),
    )?;

    for path in [assets::SCRIPT_PATH, assets::STYLE_PATH] {
        if let Some((_, body)) = assets::lookup(path, config) {
            write_file(&output.join(path.trim_start_matches('/')), &body)?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
