//! Builders
//!
//! Fluent builder patterns for native auth configuration.

pub mod config;

pub use config::{native_auth_config, NativeAuthConfigBuilder};
