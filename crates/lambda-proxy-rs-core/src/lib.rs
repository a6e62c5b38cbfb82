//! # lambda-proxy-rs-core
//!
//! Shared foundation for the lambda-proxy-rs workspace: the error taxonomy,
//! application settings, and logging setup. This crate has no dependency on
//! the routing or gateway layers.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result alias
//! - [`settings`] - Application settings with environment overrides
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;

// Re-export the most commonly used types at the crate root.
pub use error::{ProxyError, ProxyResult};
pub use settings::Settings;
