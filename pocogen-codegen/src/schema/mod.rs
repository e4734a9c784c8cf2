//! Logical schema model and JSON loader

mod loader;
mod metadata;

pub use loader::*;
pub use metadata::*;
