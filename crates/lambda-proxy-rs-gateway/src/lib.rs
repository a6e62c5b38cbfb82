//! # lambda-proxy-rs-gateway
//!
//! Gateway event model and path normalization for the lambda-proxy-rs
//! framework: the inbound proxy-integration event, case-insensitive
//! header access, and the per-request [`PathInfo`] that reconciles
//! stage, greedy-proxy resource, and custom-domain base-path mapping
//! into a logical path and mount prefix.
//!
//! ## Modules
//!
//! - [`event`] - Inbound event model and builder
//! - [`path`] - Path normalization

pub mod event;
pub mod path;

// Re-export the most commonly used types at the crate root.
pub use event::{GatewayEvent, GatewayEventBuilder, RequestContext};
pub use path::PathInfo;
