//! HTML rendering: the compiled body plus the page templates around it.

pub mod html;
pub mod page;

pub use html::render_document;
pub use page::Renderer;
