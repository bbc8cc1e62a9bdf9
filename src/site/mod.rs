//! Site structure: the category catalog, routing, and theming context.

pub mod category;
pub mod route;
pub mod theme;

pub use category::{Catalog, CategoryIcon, CategoryMeta};
pub use route::{Page, ResolveError, Route, resolve, resolve_path};
pub use theme::{ThemeContext, ThemePreference};
