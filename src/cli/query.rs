//! `folio query`: article metadata as JSON.
//!
//! ```text
//! folio query                          # every configured category
//! folio query golang --search chan     # one category, filtered
//! folio query golang --slug goroutines # one article with its outline
//! ```

use crate::{
    cli::QueryArgs,
    config::SiteConfig,
    content::{ArticleMeta, ContentStore},
    listing, log,
    toc::{self, HeadingEntry},
    utils::plural_count,
};
use anyhow::{Result, bail};
use serde::Serialize;
use std::{fs, io::Write};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Articles(Vec<ArticleMeta>),
    Article {
        #[serde(flatten)]
        meta: ArticleMeta,
        outline: Vec<HeadingEntry>,
    },
}

pub fn run_query(args: &QueryArgs, config: &SiteConfig) -> Result<()> {
    let result = query(args, config)?;
    output_result(&result, args)
}

fn query(args: &QueryArgs, config: &SiteConfig) -> Result<QueryResult> {
    let store = config.store();

    let categories: Vec<&str> = match &args.category {
        Some(slug) if !config.categories.contains(slug) => {
            bail!("unknown category `{slug}`")
        }
        Some(slug) => vec![slug.as_str()],
        None => config.categories.iter().map(|c| c.slug.as_str()).collect(),
    };

    if let (Some(slug), [category]) = (&args.slug, categories.as_slice()) {
        return query_article(&store, category, slug);
    }

    let mut articles: Vec<ArticleMeta> = categories
        .iter()
        .flat_map(|category| store.list_articles(category))
        .collect();
    listing::sort_by_date(&mut articles);

    if let Some(search) = &args.search {
        let needle = search.to_lowercase();
        articles.retain(|meta| listing::matches(meta, &needle));
    }
    Ok(QueryResult::Articles(articles))
}

fn query_article(store: &ContentStore, category: &str, slug: &str) -> Result<QueryResult> {
    let Some(article) = store.get_article(category, slug) else {
        bail!("article `{category}/{slug}` not found");
    };
    Ok(QueryResult::Article {
        outline: toc::extract(&article.body).collect(),
        meta: article.meta,
    })
}

fn output_result(result: &QueryResult, args: &QueryArgs) -> Result<()> {
    let formatted = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    // Output to file or stdout
    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)?;
        writeln!(file, "{}", formatted)?;
        let count = match result {
            QueryResult::Articles(articles) => articles.len(),
            QueryResult::Article { .. } => 1,
        };
        log!(
            "query";
            "wrote {} to {}",
            plural_count(count, "article"),
            output_path.display()
        );
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use serde_json::Value;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.set_root(dir.path());
        let golang = dir.path().join("content/golang");
        let react = dir.path().join("content/react");
        fs::create_dir_all(&golang).unwrap();
        fs::create_dir_all(&react).unwrap();
        fs::write(
            golang.join("channels.mdx"),
            "---\ntitle: Channels\ntags: [concurrency]\ndate: 2024-03-01\nseries: go-basics\n---\n\n## Buffered\n\n### Capacity\n",
        )
        .unwrap();
        fs::write(
            react.join("hooks.mdx"),
            "---\ntitle: Hooks\ndate: 2024-05-01\n---\n\nBody\n",
        )
        .unwrap();
        (dir, config)
    }

    fn args(category: Option<&str>, slug: Option<&str>, search: Option<&str>) -> QueryArgs {
        QueryArgs {
            category: category.map(String::from),
            slug: slug.map(String::from),
            search: search.map(String::from),
            pretty: false,
            output: None,
        }
    }

    fn to_json(result: &QueryResult) -> Value {
        serde_json::to_value(result).unwrap()
    }

    #[test]
    fn test_query_all_categories_newest_first() {
        let (_dir, config) = site();
        let json = to_json(&query(&args(None, None, None), &config).unwrap());
        let titles: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Hooks", "Channels"]);
    }

    #[test]
    fn test_query_search() {
        let (_dir, config) = site();
        let json = to_json(&query(&args(None, None, Some("CONCUR")), &config).unwrap());
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["category"], "golang");
    }

    #[test]
    fn test_query_article_outline_and_extra() {
        let (_dir, config) = site();
        let json = to_json(&query(&args(Some("golang"), Some("channels"), None), &config).unwrap());
        assert_eq!(json["slug"], "channels");
        assert_eq!(json["extra"]["series"], "go-basics");
        assert_eq!(json["outline"][0]["id"], "buffered");
        assert_eq!(json["outline"][1]["level"], 3);
    }

    #[test]
    fn test_query_errors() {
        let (_dir, config) = site();
        assert!(query(&args(Some("rust"), None, None), &config).is_err());
        assert!(query(&args(Some("golang"), Some("missing"), None), &config).is_err());
    }

    #[test]
    fn test_query_output_file() {
        let (dir, config) = site();
        let out = dir.path().join("out.json");
        let mut query_args = args(Some("react"), None, None);
        query_args.output = Some(PathBuf::from(&out));
        run_query(&query_args, &config).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json[0]["slug"], "hooks");
    }
}
