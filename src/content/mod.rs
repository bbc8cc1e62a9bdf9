//! Article sources: front-matter, metadata and the on-disk store.

pub mod frontmatter;
pub mod meta;
pub mod store;

pub use meta::{Article, ArticleMeta, JsonMap};
pub use store::ContentStore;
