//! Folio - a static site generator for a personal knowledge base.
//!
//! Articles live as `<content>/<category>/<slug>.mdx` files with a front-matter
//! header. They are compiled into a document tree with a few embedded
//! components, rendered into pages, and either written out by `folio build`
//! or served on demand by `folio serve`.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod content;
pub mod core;
pub mod embed;
pub mod listing;
pub mod logger;
pub mod render;
pub mod site;
pub mod spy;
pub mod toc;
pub mod utils;
