//! The inbound gateway event.
//!
//! [`GatewayEvent`] models the proxy-integration payload a function
//! receives: method, path, headers, query parameters, optional body and
//! the gateway-side routing fields (resource template, resolved path
//! parameters, request context). Header keys arrive with inconsistent
//! casing depending on the integration, so all header lookups go through
//! [`GatewayEvent::header`], which compares case-insensitively.
//!
//! [`GatewayEventBuilder`] assembles events from a method and URI, the
//! way a local development server would, and is mostly useful in tests.

use std::collections::HashMap;

use http::Method;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// The gateway request context.
///
/// Only the stage name participates in path normalization; the remaining
/// fields are kept as-is for handlers that want them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestContext {
    /// The deployment stage name, e.g. `production` or `$default`.
    pub stage: Option<String>,
    /// Everything else the gateway put in the context.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A proxy-integration event as delivered to the function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayEvent {
    /// The HTTP method as a string, e.g. `GET`.
    pub http_method: String,
    /// Request headers; `null` in some integrations, and key casing is
    /// not guaranteed.
    pub headers: Option<HashMap<String, String>>,
    /// The raw request path.
    pub path: Option<String>,
    /// The gateway-configured resource template, e.g. `/api/{proxy+}`.
    pub resource: Option<String>,
    /// Values the gateway resolved for resource placeholders.
    pub path_parameters: Option<HashMap<String, String>>,
    /// Query string parameters, already split by the gateway.
    pub query_string_parameters: Option<HashMap<String, String>>,
    /// The request context, carrying the stage name.
    pub request_context: Option<RequestContext>,
    /// The request body, possibly base64-encoded.
    pub body: Option<String>,
    /// Whether `body` is base64-encoded.
    pub is_base64_encoded: bool,
    /// Payload format version marker.
    pub version: Option<String>,
}

impl GatewayEvent {
    /// Starts building an event from a method and a URI with an optional
    /// query string.
    pub fn builder(method: Method, uri: &str) -> GatewayEventBuilder {
        GatewayEventBuilder::new(method, uri)
    }

    /// Looks up a header value, ignoring key case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Returns the host the client addressed, preferring the forwarded
    /// host over the plain host header.
    pub fn forwarded_host(&self) -> &str {
        self.header("x-forwarded-host")
            .or_else(|| self.header("host"))
            .unwrap_or("")
    }

    /// Returns the stage name from the request context, if any.
    pub fn stage(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|context| context.stage.as_deref())
    }

    /// Returns the query parameters, or an empty map when absent.
    pub fn query_parameters(&self) -> HashMap<String, String> {
        self.query_string_parameters.clone().unwrap_or_default()
    }
}

/// Builds a [`GatewayEvent`] from a method and URI.
///
/// Splits the query string off the path and decodes it the way a local
/// HTTP front end would before handing the event to the dispatcher.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use lambda_proxy_rs_gateway::GatewayEvent;
///
/// let event = GatewayEvent::builder(Method::GET, "/test/pixel?count=3")
///     .header("Host", "api.example.com")
///     .build();
/// assert_eq!(event.path.as_deref(), Some("/test/pixel"));
/// assert_eq!(event.query_parameters()["count"], "3");
/// ```
#[derive(Debug, Clone)]
pub struct GatewayEventBuilder {
    event: GatewayEvent,
}

impl GatewayEventBuilder {
    fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };

        let mut event = GatewayEvent {
            http_method: method.to_string(),
            headers: Some(HashMap::new()),
            path: Some(path.to_string()),
            ..GatewayEvent::default()
        };
        if let Some(query) = query {
            event.query_string_parameters = Some(parse_query(query));
        }

        Self { event }
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.event
            .headers
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the gateway resource template.
    #[must_use]
    pub fn resource(mut self, resource: &str) -> Self {
        self.event.resource = Some(resource.to_string());
        self
    }

    /// Adds a gateway-resolved path parameter.
    #[must_use]
    pub fn path_parameter(mut self, name: &str, value: &str) -> Self {
        self.event
            .path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a query string parameter.
    #[must_use]
    pub fn query_parameter(mut self, name: &str, value: &str) -> Self {
        self.event
            .query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the request-context stage name.
    #[must_use]
    pub fn stage(mut self, stage: &str) -> Self {
        self.event
            .request_context
            .get_or_insert_with(RequestContext::default)
            .stage = Some(stage.to_string());
        self
    }

    /// Sets a plain-text body.
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.event.body = Some(body.to_string());
        self.event.is_base64_encoded = false;
        self
    }

    /// Sets an already base64-encoded body.
    #[must_use]
    pub fn base64_body(mut self, body: &str) -> Self {
        self.event.body = Some(body.to_string());
        self.event.is_base64_encoded = true;
        self
    }

    /// Finishes the event.
    pub fn build(self) -> GatewayEvent {
        self.event
    }
}

/// Splits a query string into decoded key/value pairs.
///
/// `+` decodes to a space, percent sequences decode per form rules, and
/// a pair without `=` yields an empty value.
fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    percent_decode_str(&unplussed)
        .decode_utf8_lossy()
        .into_owned()
}
