//! Code generation module

mod active_record;
mod code_generator;
mod entity;
mod equality;
mod members;
mod naming;
mod section;
mod type_renderer;

pub use active_record::ActiveRecord;
pub use code_generator::*;
pub use entity::*;
pub use equality::Equality;
pub use members::Members;
pub use naming::*;
pub use section::*;
pub use type_renderer::*;
