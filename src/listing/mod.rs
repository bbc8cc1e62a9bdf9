//! Filtering and ordering of article metadata.

use std::cmp::Ordering;

use crate::content::ArticleMeta;

/// Order newest first.
///
/// Articles with a parsable date come first, descending. Equal dates, and
/// articles whose date is empty or unparsable, fall back to slug order so
/// the result never depends on directory iteration order.
pub fn sort_by_date(articles: &mut [ArticleMeta]) {
    articles.sort_by(compare_by_date);
}

fn compare_by_date(a: &ArticleMeta, b: &ArticleMeta) -> Ordering {
    let by_date = match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| a.slug.cmp(&b.slug))
        .then_with(|| a.category.cmp(&b.category))
}

/// Case-insensitive substring match on the title or any tag.
///
/// Only an empty query matches everything; whitespace is matched literally.
pub fn search<'a>(articles: &'a [ArticleMeta], query: &str) -> Vec<&'a ArticleMeta> {
    let needle = query.to_lowercase();
    articles
        .iter()
        .filter(|meta| matches(meta, &needle))
        .collect()
}

/// Whether one article matches an already-lowercased query.
pub fn matches(meta: &ArticleMeta, needle: &str) -> bool {
    needle.is_empty()
        || meta.title.to_lowercase().contains(needle)
        || meta.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Articles whose category key equals `category` exactly.
pub fn by_category<'a>(articles: &'a [ArticleMeta], category: &str) -> Vec<&'a ArticleMeta> {
    articles
        .iter()
        .filter(|meta| meta.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(category: &str, slug: &str, title: &str, tags: &[&str], date: &str) -> ArticleMeta {
        let mut meta = ArticleMeta::defaults(category, slug);
        meta.title = title.to_string();
        meta.tags = tags.iter().map(|t| t.to_string()).collect();
        meta.date = date.to_string();
        meta
    }

    fn sample() -> Vec<ArticleMeta> {
        vec![
            article(
                "golang",
                "goroutines-channels",
                "Goroutines & Channels",
                &["concurrency", "goroutines", "channels"],
                "2025-01-15",
            ),
            article(
                "golang",
                "rest-apis-gin",
                "REST APIs with Gin",
                &["gin", "rest", "api", "middleware"],
                "2025-01-20",
            ),
        ]
    }

    fn slugs(found: &[&ArticleMeta]) -> Vec<String> {
        found.iter().map(|m| m.slug.clone()).collect()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut articles = sample();
        sort_by_date(&mut articles);
        assert_eq!(articles[0].date, "2025-01-20");
        assert_eq!(articles[1].date, "2025-01-15");
    }

    #[test]
    fn test_sort_unparsable_last_by_slug() {
        let mut articles = vec![
            article("golang", "zeta", "Z", &[], ""),
            article("golang", "alpha", "A", &[], "someday"),
            article("golang", "dated", "D", &[], "2020-01-01"),
        ];
        sort_by_date(&mut articles);
        let order: Vec<_> = articles.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(order, vec!["dated", "alpha", "zeta"]);
    }

    #[test]
    fn test_sort_equal_dates_by_slug() {
        let mut articles = vec![
            article("golang", "b", "B", &[], "2025-01-15"),
            article("golang", "a", "A", &[], "Jan 15, 2025"),
        ];
        sort_by_date(&mut articles);
        assert_eq!(articles[0].slug, "a");
    }

    #[test]
    fn test_search_title_and_tags() {
        let articles = sample();
        assert_eq!(slugs(&search(&articles, "chan")), vec!["goroutines-channels"]);
        assert_eq!(slugs(&search(&articles, "api")), vec!["rest-apis-gin"]);
        assert_eq!(search(&articles, "").len(), 2);
    }

    #[test]
    fn test_search_case_insensitive() {
        let articles = sample();
        assert_eq!(slugs(&search(&articles, "GIN")), vec!["rest-apis-gin"]);
        assert_eq!(slugs(&search(&articles, "Middle")), vec!["rest-apis-gin"]);
        assert!(search(&articles, "rust").is_empty());
    }

    #[test]
    fn test_search_whitespace_is_literal() {
        let articles = sample();
        assert!(search(&articles, "  ").is_empty());
        assert_eq!(slugs(&search(&articles, "with gin")), vec!["rest-apis-gin"]);
    }

    #[test]
    fn test_by_category_exact() {
        let mut articles = sample();
        articles.push(article("react", "hooks", "Hooks", &[], ""));
        assert_eq!(by_category(&articles, "golang").len(), 2);
        assert_eq!(slugs(&by_category(&articles, "react")), vec!["hooks"]);
        assert!(by_category(&articles, "Golang").is_empty());
        assert!(by_category(&articles, "go").is_empty());
    }
}
