//! Template types for typed variable injection.

use regex::{Captures, Regex};
use std::marker::PhantomData;
use std::sync::LazyLock;

/// `__NAME__` placeholder, upper-case words joined by single underscores.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__[A-Z]+(?:_[A-Z]+)*__").unwrap());

/// A set of values substituted into one template's placeholders.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace every placeholder of `content` in a single pass.
///
/// Inserted values are never scanned again. Unknown placeholders stay as
/// they are.
pub fn substitute(content: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            let found = &caps[0];
            values
                .iter()
                .find(|(name, _)| *name == found)
                .map_or(found, |(_, value)| *value)
                .to_string()
        })
        .into_owned()
}
