//! Domain layer containing the plugin contract.
//!
//! This module defines the data types exchanged across the host/plugin
//! boundary, the two capability traits every plugin must satisfy, and the
//! loading ports that infrastructure adapters implement.

pub mod merchant;
pub mod payment;
pub mod ports;
