//! # lambda-proxy-rs
//!
//! Request routing and proxy integration for serverless Rust functions
//! behind an API gateway.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. Depend on `lambda-proxy-rs` to get the whole framework, or on
//! individual crates for finer-grained control.
//!
//! ## Example
//!
//! ```
//! use lambda_proxy_rs::http::Method;
//! use lambda_proxy_rs::{Api, GatewayEvent, Response, RouteOptions, Settings};
//!
//! let settings = Settings::new("demo").configure_logs(false);
//! let mut app = Api::new(settings).unwrap();
//! app.get("/test/<string:user>", RouteOptions::new().cors(true), |request| {
//!     let user = request.arg("user").map(ToString::to_string).unwrap_or_default();
//!     Response::json(&lambda_proxy_rs::serde_json::json!({ "user": user }))
//! })
//! .unwrap();
//!
//! let event = GatewayEvent::builder(Method::GET, "/test/remote").build();
//! let response = app.handle(event, None);
//! assert_eq!(response.status_code, 200);
//! ```

/// Core types: settings, error classification, logging setup.
pub use lambda_proxy_rs_core as core;

/// Route templates, typed parameters and the route table.
pub use lambda_proxy_rs_routing as routing;

/// The gateway event model and path normalization.
pub use lambda_proxy_rs_gateway as gateway;

/// Application object, dispatcher, envelope and documentation.
pub use lambda_proxy_rs_api as api;

// The handful of types nearly every application touches.
pub use lambda_proxy_rs_api::{Api, GatewayResponse, Request, Response, RouteOptions};
pub use lambda_proxy_rs_core::{ProxyError, ProxyResult, Settings};
pub use lambda_proxy_rs_gateway::GatewayEvent;

// Third-party re-exports for user convenience.
pub use http;
pub use serde_json;
