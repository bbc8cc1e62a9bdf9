//! Small helpers shared across modules.

pub mod date;
pub mod html;
pub mod mime;
pub mod plural;
pub mod slug;

pub use plural::plural_count;
