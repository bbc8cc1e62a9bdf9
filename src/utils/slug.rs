//! Heading and category slugification.
//!
//! Heading ids are anchor targets shared by three parties: the compiled body,
//! the extracted outline, and the browser-side scroll spy. All of them go
//! through [`slugify`], so the rules below are load-bearing.
//!
//! # Rules
//!
//! 1. Lowercase the text.
//! 2. Drop every character that is not a word character (`[A-Za-z0-9_]`),
//!    whitespace, or `-`.
//! 3. Trim leading and trailing whitespace.
//! 4. Collapse each internal whitespace run into a single `-`.
//!
//! Hyphen runs are *not* collapsed: `"a - b"` becomes `"a---b"`.

/// Convert display text into an anchor id.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("What is a goroutine?"), "what-is-a-goroutine");
/// assert_eq!(slugify("goroutines-channels"), "goroutines-channels");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered.chars().filter(|&c| is_slug_char(c)).collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.trim().chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if in_space {
            slug.push('-');
            in_space = false;
        }
        slug.push(c);
    }
    slug
}

/// Check whether a string is already in slug form (slugifying it is a no-op).
#[inline]
pub fn is_slug(text: &str) -> bool {
    !text.is_empty() && slugify(text) == text
}

/// Characters surviving rule 2.
#[inline]
fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace()
}
