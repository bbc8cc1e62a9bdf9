//! Article body compilation: markdown plus embedded components.
//!
//! Compilation is a pure function of the body text. The same input always
//! yields the same [`Document`], and any syntax problem is a [`CompileError`]
//! with no partial output.

pub mod component;
pub mod convert;
pub mod error;
pub mod node;

pub use convert::compile;
pub use error::{CompileError, CompileErrorKind};
pub use node::{CalloutKind, Component, Document, Element, Node};
