//! Built-in plugins shipped with the compiled-in registry.

pub mod simple;
