//! # lambda-proxy-rs-api
//!
//! The application layer of the lambda-proxy-rs framework: route
//! registration with per-route response options, the gateway event
//! dispatcher, response envelope sealing and self-hosted OpenAPI
//! documentation.
//!
//! ## Modules
//!
//! - [`api`] - Application object, route options and dispatch
//! - [`request`] - The request handed to route handlers
//! - [`response`] - Handler responses and the gateway envelope
//! - [`templates`] - HTML shells for the bundled documentation UIs
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use lambda_proxy_rs_api::{Api, Response, RouteOptions};
//! use lambda_proxy_rs_core::Settings;
//! use lambda_proxy_rs_gateway::GatewayEvent;
//!
//! let settings = Settings::new("demo").configure_logs(false).add_docs(false);
//! let mut app = Api::new(settings).unwrap();
//! app.get("/test/<user>", RouteOptions::new().cors(true), |request| {
//!     let user = request.arg("user").map(ToString::to_string).unwrap_or_default();
//!     Response::json(&serde_json::json!({ "user": user }))
//! })
//! .unwrap();
//!
//! let event = GatewayEvent::builder(Method::GET, "/test/remote").build();
//! let response = app.handle(event, None);
//! assert_eq!(response.status_code, 200);
//! assert_eq!(response.body, r#"{"user":"remote"}"#);
//! ```

pub mod api;
mod docs;
pub mod request;
pub mod response;
pub mod templates;

// Re-export the most commonly used types at the crate root.
pub use api::{Api, RouteHandler, RouteOptions};
pub use request::Request;
pub use response::{Body, GatewayResponse, Response, ResponseSettings, BINARY_TYPES};
