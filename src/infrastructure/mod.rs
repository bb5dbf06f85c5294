//! Infrastructure adapters implementing the loading ports.
//!
//! Two strategies exist behind `PluginLoader`: a compiled-in registry for
//! statically linked plugins, and a directory loader that opens native
//! dynamic libraries when the `dynamic-loading` feature is enabled.

pub mod dylib;
pub mod registry;
