//! Configuration for pocogen-codegen

pub mod defaults;
mod settings;

pub use settings::CodegenConfig;
