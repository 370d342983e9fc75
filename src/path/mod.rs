//! Path arithmetic and confinement.
//!
//! The relation helpers are lexical only. The confinement checks resolve
//! paths on disk before comparing them, tolerating components that do not
//! exist yet.

mod confine;
mod relation;
mod resolve;

pub use confine::{is_nested_in, nest_path};
pub use relation::{absolute, relative_path};
