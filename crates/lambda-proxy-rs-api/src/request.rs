//! The request value handed to route handlers.

use std::collections::HashMap;

use http::Method;
use serde_json::Value;

use lambda_proxy_rs_gateway::GatewayEvent;
use lambda_proxy_rs_routing::ParamValue;

/// One dispatched request.
///
/// Carries the typed arguments (path parameters merged with query
/// parameters, query winning on collision), the decoded body for
/// body-carrying methods, and the raw event and invocation context for
/// handlers that need provider-specific fields.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) args: HashMap<String, ParamValue>,
    pub(crate) body: Option<String>,
    pub(crate) host: String,
    pub(crate) prefix: String,
    pub(crate) event: GatewayEvent,
    pub(crate) context: Option<Value>,
}

impl Request {
    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the logical request path the route matched.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns all typed arguments.
    pub const fn args(&self) -> &HashMap<String, ParamValue> {
        &self.args
    }

    /// Returns one argument by name.
    pub fn arg(&self, name: &str) -> Option<&ParamValue> {
        self.args.get(name)
    }

    /// Returns the decoded request body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the externally-visible base URL for this deployment,
    /// scheme and mount prefix included.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the mount prefix under which the application is served.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns a request header, ignoring key case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.event.header(name)
    }

    /// Returns the raw gateway event.
    pub const fn event(&self) -> &GatewayEvent {
        &self.event
    }

    /// Returns the invocation context, if the runtime provided one.
    pub const fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }
}
