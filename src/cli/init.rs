//! Site initialization.
//!
//! Writes `folio.toml` (every section spelled out, the category list
//! included) and one sample article to start from.

use crate::{
    config::SiteConfig,
    embed::init::{SAMPLE_ARTICLE, SAMPLE_CATEGORY, SAMPLE_SLUG},
    log,
};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Create a new site at the config's root.
///
/// Refuses to touch an existing config file. An existing sample article is
/// left as it is.
pub fn new_site(config: &SiteConfig) -> Result<()> {
    let config_path = &config.config_path;
    if config_path.exists() {
        bail!(
            "'{}' already exists, refusing to overwrite it",
            config_path.display()
        );
    }

    let root = config.get_root();
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory '{}'", root.display()))?;

    let template = generate_config_template(config)?;
    write_new(config_path, &template)?;

    let article = config
        .content_dir()
        .join(SAMPLE_CATEGORY)
        .join(format!("{SAMPLE_SLUG}.{}", config.build.extension));
    if !article.exists() {
        write_new(&article, SAMPLE_ARTICLE)?;
    }

    log!("init"; "site initialized in {}", root.display());
    Ok(())
}

/// `folio.toml` content for `config`, headed by a version comment.
pub fn generate_config_template(config: &SiteConfig) -> Result<String> {
    let body = toml::to_string(config).context("Failed to serialize default config")?;
    Ok(format!(
        "# Folio configuration file (v{})\n\n{}",
        env!("CARGO_PKG_VERSION"),
        body
    ))
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Catalog;
    use tempfile::TempDir;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.config_path = root.join("folio.toml");
        config.set_root(root);
        config
    }

    #[test]
    fn test_template_round_trips() {
        let template = generate_config_template(&SiteConfig::default()).unwrap();
        assert!(template.starts_with("# Folio configuration file"));
        assert!(template.contains("[[categories]]"));

        let parsed: SiteConfig = toml::from_str(&template).unwrap();
        assert_eq!(parsed.categories, Catalog::builtin());
        assert_eq!(parsed.serve.port, 5277);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_new_site_writes_config_and_sample() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("notes");
        let config = config_at(&root);

        new_site(&config).unwrap();
        assert!(root.join("folio.toml").is_file());

        let sample = fs::read_to_string(root.join("content/golang/goroutines-channels.mdx")).unwrap();
        assert!(sample.contains("## What is a goroutine?"));
    }

    #[test]
    fn test_new_site_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let config = config_at(dir.path());
        fs::write(&config.config_path, "[site]\ntitle = \"Mine\"\n").unwrap();

        assert!(new_site(&config).is_err());
        let kept = fs::read_to_string(&config.config_path).unwrap();
        assert!(kept.contains("Mine"));
    }

    #[test]
    fn test_sample_article_compiles() {
        let extracted = crate::content::frontmatter::extract(SAMPLE_ARTICLE);
        assert_eq!(extracted.fields["readTime"], 6);

        let document = crate::compiler::compile(extracted.body).unwrap();
        let ids: Vec<String> = document.headings().into_iter().map(|h| h.id).collect();
        assert_eq!(
            ids,
            [
                "what-is-a-goroutine",
                "channels",
                "buffered-channels",
                "the-select-statement"
            ]
        );
    }
}
