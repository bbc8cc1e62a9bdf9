//! Configuration section definitions.
//!
//! | Section          | Purpose                                  |
//! |------------------|------------------------------------------|
//! | `[site]`         | Title, description, author, public URL   |
//! | `[build]`        | Content/output paths, article extension  |
//! | `[serve]`        | Development server (interface, port)     |
//! | `[theme]`        | Default theme and persistence key        |
//! | `[[categories]]` | Static category catalog                  |

mod build;
pub mod category;
mod serve;
mod site;
mod theme;

pub use build::BuildConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig as SiteSectionConfig;
pub use theme::ThemeConfig;
