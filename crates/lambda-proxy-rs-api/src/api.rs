//! The application object and request dispatcher.
//!
//! [`Api`] owns the settings and the route table. Routes are registered
//! during initialization; afterwards the table is immutable and
//! [`Api::handle`] can serve concurrent invocations without
//! synchronization.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http::Method;
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use lambda_proxy_rs_core::logging::{invocation_span, setup_logging};
use lambda_proxy_rs_core::{ProxyError, ProxyResult, Settings};
use lambda_proxy_rs_gateway::{GatewayEvent, PathInfo};
use lambda_proxy_rs_routing::{extract_arguments, ParamValue, RouteTable};

use crate::docs;
use crate::request::Request;
use crate::response::{GatewayResponse, Response, ResponseSettings};
use crate::templates;

/// A route handler: takes the dispatched request, returns a response or
/// a classified error.
pub type RouteHandler = Arc<dyn Fn(Request) -> ProxyResult<Response> + Send + Sync>;

/// What a registered route dispatches to.
///
/// The documentation endpoints are dispatched internally because they
/// read the live route table and the per-request mount prefix.
#[derive(Clone)]
pub(crate) enum Endpoint {
    Handler(RouteHandler),
    OpenApiJson,
    SwaggerUi,
    Redoc,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler"),
            Self::OpenApiJson => f.write_str("OpenApiJson"),
            Self::SwaggerUi => f.write_str("SwaggerUi"),
            Self::Redoc => f.write_str("Redoc"),
        }
    }
}

/// Registration options for one route.
///
/// # Examples
///
/// ```
/// use lambda_proxy_rs_api::RouteOptions;
///
/// let options = RouteOptions::new()
///     .cors(true)
///     .payload_compression("gzip")
///     .cache_control("public,max-age=3600");
/// assert!(options.cors);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Emit CORS headers on responses from this route.
    pub cors: bool,
    /// Require a valid `access_token` query parameter.
    pub token: bool,
    /// Compress response payloads with this mode when the client
    /// accepts it. One of `gzip`, `zlib` or `deflate`.
    pub payload_compression: Option<String>,
    /// Base64-encode binary response bodies.
    pub binary_b64encode: bool,
    /// Cache lifetime in seconds for 200 responses. Deprecated in
    /// favor of `cache_control`.
    pub ttl: Option<u32>,
    /// Literal `Cache-Control` value for 200 responses.
    pub cache_control: Option<String>,
    /// Operation description for the generated documentation.
    pub description: Option<String>,
    /// Operation tags for the generated documentation.
    pub tags: Vec<String>,
}

impl RouteOptions {
    /// Creates the default options: no CORS, no token, no compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits CORS headers on responses from this route.
    #[must_use]
    pub const fn cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Requires a valid `access_token` query parameter.
    #[must_use]
    pub const fn token(mut self, token: bool) -> Self {
        self.token = token;
        self
    }

    /// Sets the response compression mode.
    #[must_use]
    pub fn payload_compression(mut self, mode: impl Into<String>) -> Self {
        self.payload_compression = Some(mode.into());
        self
    }

    /// Base64-encodes binary response bodies.
    #[must_use]
    pub const fn binary_b64encode(mut self, enable: bool) -> Self {
        self.binary_b64encode = enable;
        self
    }

    /// Sets the cache lifetime in seconds for 200 responses.
    #[must_use]
    pub const fn ttl(mut self, seconds: u32) -> Self {
        self.ttl = Some(seconds);
        self
    }

    /// Sets the literal `Cache-Control` value for 200 responses.
    #[must_use]
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Sets the operation description for the documentation.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Appends an operation tag for the documentation.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// One registered route: the endpoint and its options.
#[derive(Debug, Clone)]
pub(crate) struct Route {
    pub(crate) endpoint: Endpoint,
    pub(crate) options: RouteOptions,
}

/// The application: settings plus the route table.
#[derive(Debug)]
pub struct Api {
    settings: Settings,
    routes: RouteTable<Route>,
}

impl Api {
    /// Creates an application from settings.
    ///
    /// Configures logging and registers the documentation routes
    /// (`/openapi.json`, `/docs`, `/redoc`) unless the settings disable
    /// them.
    ///
    /// # Errors
    ///
    /// Returns a registration error if a documentation route cannot be
    /// registered, which only happens when the process state is already
    /// inconsistent.
    pub fn new(settings: Settings) -> ProxyResult<Self> {
        if settings.configure_logs {
            setup_logging(&settings);
        }

        let mut api = Self {
            settings,
            routes: RouteTable::new(),
        };
        if api.settings.add_docs {
            api.setup_docs()?;
        }
        Ok(api)
    }

    /// Returns the application settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub(crate) const fn routes(&self) -> &RouteTable<Route> {
        &self.routes
    }

    /// Registers a route for the given methods.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Compile`] for a malformed template,
    /// [`ProxyError::DuplicateRoute`] when the template and a method are
    /// already taken, and [`ProxyError::InvalidOption`] for an
    /// unsupported compression mode.
    pub fn route<F>(
        &mut self,
        template: &str,
        methods: Vec<Method>,
        options: RouteOptions,
        handler: F,
    ) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.add_route(template, methods, options, Endpoint::Handler(Arc::new(handler)))
    }

    /// Registers a GET route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn get<F>(&mut self, template: &str, options: RouteOptions, handler: F) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::GET], options, handler)
    }

    /// Registers a POST route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn post<F>(&mut self, template: &str, options: RouteOptions, handler: F) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::POST], options, handler)
    }

    /// Registers a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn put<F>(&mut self, template: &str, options: RouteOptions, handler: F) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::PUT], options, handler)
    }

    /// Registers a PATCH route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn patch<F>(&mut self, template: &str, options: RouteOptions, handler: F) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::PATCH], options, handler)
    }

    /// Registers a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn delete<F>(&mut self, template: &str, options: RouteOptions, handler: F) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::DELETE], options, handler)
    }

    /// Registers an OPTIONS route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn options<F>(
        &mut self,
        template: &str,
        options: RouteOptions,
        handler: F,
    ) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::OPTIONS], options, handler)
    }

    /// Registers a HEAD route.
    ///
    /// # Errors
    ///
    /// See [`Api::route`].
    pub fn head<F>(&mut self, template: &str, options: RouteOptions, handler: F) -> ProxyResult<()>
    where
        F: Fn(Request) -> ProxyResult<Response> + Send + Sync + 'static,
    {
        self.route(template, vec![Method::HEAD], options, handler)
    }

    fn add_route(
        &mut self,
        template: &str,
        methods: Vec<Method>,
        options: RouteOptions,
        endpoint: Endpoint,
    ) -> ProxyResult<()> {
        if let Some(mode) = &options.payload_compression {
            if !matches!(mode.as_str(), "gzip" | "zlib" | "deflate") {
                return Err(ProxyError::InvalidOption(format!(
                    "'{mode}' is not a supported compression"
                )));
            }
        }
        if options.ttl.is_some() {
            warn!(template, "ttl is deprecated, use cache_control instead");
        }

        self.routes.register(template, methods, Route { endpoint, options })
    }

    /// Registers the bundled documentation routes.
    fn setup_docs(&mut self) -> ProxyResult<()> {
        self.add_route(
            "/openapi.json",
            vec![Method::GET],
            RouteOptions::new()
                .cors(true)
                .tag("documentation")
                .description("Return OpenAPI json."),
            Endpoint::OpenApiJson,
        )?;
        self.add_route(
            "/docs",
            vec![Method::GET],
            RouteOptions::new()
                .cors(true)
                .tag("documentation")
                .description("Display Swagger HTML UI."),
            Endpoint::SwaggerUi,
        )?;
        self.add_route(
            "/redoc",
            vec![Method::GET],
            RouteOptions::new()
                .cors(true)
                .tag("documentation")
                .description("Display Redoc HTML UI."),
            Endpoint::Redoc,
        )
    }

    /// Builds the externally-visible base URL for a request.
    fn host_for(&self, event: &GatewayEvent, path_info: &PathInfo) -> String {
        format!(
            "{}://{}{}",
            self.settings.scheme(),
            event.forwarded_host(),
            path_info.prefix()
        )
    }

    /// Dispatches one gateway event.
    ///
    /// The pipeline: normalize the path, resolve the route, check the
    /// access token, extract and convert path arguments, merge query
    /// parameters (query wins on collision), decode the body for
    /// body-carrying methods, run the endpoint, and seal the response
    /// with the route's envelope settings. Classified errors become
    /// structured JSON error envelopes; nothing propagates as a panic.
    pub fn handle(&self, event: GatewayEvent, context: Option<Value>) -> GatewayResponse {
        let request_id = Uuid::new_v4().to_string();
        let span = invocation_span(&request_id);
        let _guard = span.enter();

        if let Ok(serialized) = serde_json::to_string(&event) {
            debug!(event = %serialized, "received event");
        }

        let path_info = PathInfo::from_event(&event);
        let Some(path) = path_info.path().map(ToOwned::to_owned) else {
            return Response::from_error(&ProxyError::NoPathResolved)
                .into_gateway(&ResponseSettings::default());
        };

        let Ok(method) = event.http_method.parse::<Method>() else {
            return Response::from_error(&ProxyError::NoRouteMatched {
                method: event.http_method.clone(),
                path,
            })
            .into_gateway(&ResponseSettings::default());
        };

        let Some(entry) = self.routes.resolve(&path, &method) else {
            return Response::from_error(&ProxyError::NoRouteMatched {
                method: method.to_string(),
                path,
            })
            .into_gateway(&ResponseSettings::default());
        };
        let route = entry.handler();

        let mut query = event.query_parameters();
        if route.options.token && !validate_token(query.get("access_token").map(String::as_str)) {
            return Response::from_error(&ProxyError::InvalidToken)
                .into_gateway(&ResponseSettings::default());
        }
        query.remove("access_token");

        let mut args = match extract_arguments(entry.pattern(), &path) {
            Ok(args) => args,
            Err(err) => {
                return Response::from_error(&err).into_gateway(&ResponseSettings::default())
            }
        };
        for (name, value) in query {
            args.insert(name, ParamValue::Str(value));
        }

        let body = match decode_body(&event, &method) {
            Ok(body) => body,
            Err(err) => {
                return Response::from_error(&err).into_gateway(&ResponseSettings::default())
            }
        };

        let accept_encoding = event.header("accept-encoding").unwrap_or("").to_string();
        let envelope = ResponseSettings {
            cors: route.options.cors,
            accepted_methods: entry.methods(),
            accepted_compression: &accept_encoding,
            compression: route.options.payload_compression.as_deref(),
            b64encode: route.options.binary_b64encode,
            ttl: route.options.ttl,
            cache_control: route.options.cache_control.as_deref(),
        };

        let request = Request {
            method,
            path,
            args,
            body,
            host: self.host_for(&event, &path_info),
            prefix: path_info.prefix(),
            event,
            context,
        };

        let response = match self.run_endpoint(&route.endpoint, request, &path_info) {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "endpoint failed");
                Response::from_error(&err)
            }
        };

        response.into_gateway(&envelope)
    }

    fn run_endpoint(
        &self,
        endpoint: &Endpoint,
        request: Request,
        path_info: &PathInfo,
    ) -> ProxyResult<Response> {
        let prefix = path_info.prefix();
        match endpoint {
            Endpoint::Handler(handler) => handler(request),
            Endpoint::OpenApiJson => {
                let document = docs::openapi_document(&self.settings, self.routes(), &prefix);
                Response::json(&document)
            }
            Endpoint::SwaggerUi => Ok(Response::html(templates::swagger(
                &format!("{prefix}/openapi.json"),
                &format!("{} - Swagger UI", self.settings.name),
            ))),
            Endpoint::Redoc => Ok(Response::html(templates::redoc(
                &format!("{prefix}/openapi.json"),
                &format!("{} - ReDoc", self.settings.name),
            ))),
        }
    }
}

/// Compares the supplied token against the `TOKEN` environment
/// variable. Missing or empty values on either side fail.
fn validate_token(token: Option<&str>) -> bool {
    let Ok(env_token) = std::env::var("TOKEN") else {
        return false;
    };
    match token {
        Some(token) if !token.is_empty() && !env_token.is_empty() => token == env_token,
        _ => false,
    }
}

/// Returns the request body for body-carrying methods, decoding base64
/// payloads first.
fn decode_body(event: &GatewayEvent, method: &Method) -> ProxyResult<Option<String>> {
    if !matches!(method.as_str(), "POST" | "PUT" | "PATCH") {
        return Ok(None);
    }
    let Some(body) = event.body.as_deref().filter(|body| !body.is_empty()) else {
        return Ok(None);
    };

    if event.is_base64_encoded {
        let bytes = STANDARD
            .decode(body)
            .map_err(|err| ProxyError::InvalidBody(err.to_string()))?;
        let text =
            String::from_utf8(bytes).map_err(|err| ProxyError::InvalidBody(err.to_string()))?;
        Ok(Some(text))
    } else {
        Ok(Some(body.to_string()))
    }
}
