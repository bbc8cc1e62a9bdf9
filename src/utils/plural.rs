//! Pluralization for log lines.

/// Suffix for a noun counted `n` times.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `"1 article"`, `"3 articles"`, `"0 articles"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "article"), "0 articles");
        assert_eq!(plural_count(1, "article"), "1 article");
        assert_eq!(plural_count(7, "page"), "7 pages");
    }
}
