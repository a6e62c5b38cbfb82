//! Runtime settings for a proxy application.
//!
//! [`Settings`] holds the per-application configuration consumed by the
//! dispatcher and the documentation generator. Values are set in code,
//! with optional environment overrides via [`Settings::from_env`].

/// Configuration for a proxy application.
///
/// # Examples
///
/// ```
/// use lambda_proxy_rs_core::Settings;
///
/// let settings = Settings::new("my-service");
/// assert_eq!(settings.name, "my-service");
/// assert_eq!(settings.version, "0.0.1");
/// assert!(settings.add_docs);
/// assert!(settings.https);
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// Service name, reported as the title of generated documentation.
    pub name: String,
    /// Service version, reported in generated documentation.
    pub version: String,
    /// Free-text description of the service.
    pub description: Option<String>,
    /// Whether the documentation routes are registered at startup.
    pub add_docs: bool,
    /// Whether the global logging subscriber is installed at startup.
    pub configure_logs: bool,
    /// Whether debug mode is enabled.
    pub debug: bool,
    /// Whether absolute URLs are built with the https scheme.
    pub https: bool,
    /// The log level passed to the subscriber filter (e.g. "info", "debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "lambda-proxy".to_string(),
            version: "0.0.1".to_string(),
            description: None,
            add_docs: true,
            configure_logs: true,
            debug: false,
            https: true,
            log_level: "error".to_string(),
        }
    }
}

impl Settings {
    /// Creates settings with the given service name and defaults for
    /// everything else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates settings from the service name, then applies environment
    /// variable overrides.
    ///
    /// Supported environment variables:
    ///
    /// - `LAMBDA_PROXY_DEBUG` -> `debug` ("true"/"1"/"yes" => true)
    /// - `LAMBDA_PROXY_LOG_LEVEL` -> `log_level`
    /// - `LAMBDA_PROXY_ADD_DOCS` -> `add_docs`
    /// - `LAMBDA_PROXY_HTTPS` -> `https`
    pub fn from_env(name: impl Into<String>) -> Self {
        let mut settings = Self::new(name);

        if let Ok(val) = std::env::var("LAMBDA_PROXY_DEBUG") {
            settings.debug = parse_bool(&val);
        }
        if let Ok(val) = std::env::var("LAMBDA_PROXY_LOG_LEVEL") {
            settings.log_level = val;
        }
        if let Ok(val) = std::env::var("LAMBDA_PROXY_ADD_DOCS") {
            settings.add_docs = parse_bool(&val);
        }
        if let Ok(val) = std::env::var("LAMBDA_PROXY_HTTPS") {
            settings.https = parse_bool(&val);
        }

        settings
    }

    /// Sets the service version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the service description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enables or disables the documentation routes.
    #[must_use]
    pub const fn add_docs(mut self, add_docs: bool) -> Self {
        self.add_docs = add_docs;
        self
    }

    /// Enables or disables logging subscriber installation.
    #[must_use]
    pub const fn configure_logs(mut self, configure_logs: bool) -> Self {
        self.configure_logs = configure_logs;
        self
    }

    /// Enables or disables debug mode.
    ///
    /// Debug mode switches logging to a verbose human-readable format and
    /// raises the default filter level.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        if debug {
            self.log_level = "debug".to_string();
        }
        self
    }

    /// Selects the URL scheme used when building absolute URLs.
    #[must_use]
    pub const fn https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    /// Returns the URL scheme implied by the `https` flag.
    pub const fn scheme(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert_eq!(s.name, "lambda-proxy");
        assert_eq!(s.version, "0.0.1");
        assert!(s.description.is_none());
        assert!(s.add_docs);
        assert!(s.configure_logs);
        assert!(!s.debug);
        assert!(s.https);
        assert_eq!(s.log_level, "error");
    }

    #[test]
    fn test_new_sets_name() {
        let s = Settings::new("tiles");
        assert_eq!(s.name, "tiles");
        assert_eq!(s.version, "0.0.1");
    }

    #[test]
    fn test_builder_chain() {
        let s = Settings::new("tiles")
            .version("1.2.0")
            .description("tile server")
            .add_docs(false)
            .https(false);
        assert_eq!(s.version, "1.2.0");
        assert_eq!(s.description.as_deref(), Some("tile server"));
        assert!(!s.add_docs);
        assert!(!s.https);
    }

    #[test]
    fn test_debug_raises_log_level() {
        let s = Settings::new("tiles").debug(true);
        assert!(s.debug);
        assert_eq!(s.log_level, "debug");
    }

    #[test]
    fn test_scheme() {
        assert_eq!(Settings::new("a").scheme(), "https");
        assert_eq!(Settings::new("a").https(false).scheme(), "http");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("YES"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
    }
}
