//! Interface adapters for the harness: configuration file loading.

pub mod config;
