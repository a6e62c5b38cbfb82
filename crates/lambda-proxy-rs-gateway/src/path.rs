//! Request path normalization.
//!
//! A function can sit behind the gateway in several ways: direct
//! invocation, a REST API stage on the managed domain, an HTTP API
//! `$default` stage, or a custom domain with a base-path mapping, with
//! or without a greedy-proxy resource. [`PathInfo`] reconciles those
//! into a logical request path (what the route table matches against)
//! and a mount prefix (what documentation and absolute links are built
//! from).
//!
//! Exactly one of {managed stage, custom path-mapping, neither} applies
//! to a deployment. Detection is textual: the managed domain is
//! recognized by its host-name markers, and the path-mapping is the
//! literal difference between the raw path and `api-prefix + logical
//! path`. An operator fronting the managed domain markers with an
//! unusual custom domain can defeat the heuristic; there is no stronger
//! signal in the event to distinguish the two.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::event::GatewayEvent;

/// Matches a trailing greedy placeholder in a resource template, e.g.
/// the `/{proxy+}` suffix of `/api/{proxy+}`. The leading slash is
/// required: a bare `{proxy+}` resource is not treated as greedy.
static PROXY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\{(?P<name>.+)\+\}$").expect("proxy pattern is valid"));

/// Host-name markers of the gateway's managed domain.
const MANAGED_DOMAIN_MARKERS: [&str; 2] = [".execute-api.", ".amazonaws.com"];

/// Normalized path information for one request.
///
/// Built fresh from each event and read-only afterwards; normalizing
/// the same event twice yields equal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    version: Option<String>,
    stage: String,
    path: Option<String>,
    api_prefix: String,
    path_mapping: String,
}

impl PathInfo {
    /// Normalizes a gateway event.
    pub fn from_event(event: &GatewayEvent) -> Self {
        let stage = detect_stage(event);
        let path = resolve_path(event);

        let resource = event.resource.as_deref().unwrap_or("");
        let api_prefix = PROXY_PATTERN
            .replace(resource, "")
            .trim_end_matches('/')
            .to_string();

        let path_mapping = match &path {
            Some(path) if stage.is_empty() && !path.is_empty() => {
                let raw = event.path.as_deref().unwrap_or("");
                raw.replacen(&format!("{api_prefix}{path}"), "", 1)
            }
            _ => String::new(),
        };

        Self {
            version: event.version.clone(),
            stage,
            path,
            api_prefix,
            path_mapping,
        }
    }

    /// Returns the payload format version marker, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the managed-domain stage name, or `""` when the request
    /// did not come through the managed domain.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Returns the logical request path the route table matches
    /// against, or `None` when the event carries no usable path.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the fixed resource prefix in front of the greedy
    /// placeholder, trailing slash stripped.
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Returns the custom-domain base-path segment, or `""`.
    pub fn path_mapping(&self) -> &str {
        &self.path_mapping
    }

    /// Computes the mount prefix.
    ///
    /// A managed-domain stage (other than the `$default` marker) wins,
    /// then a custom-domain path-mapping, then the api-prefix alone.
    pub fn prefix(&self) -> String {
        if !self.stage.is_empty() && self.stage != "$default" {
            format!("/{}{}", self.stage, self.api_prefix)
        } else if self.path_mapping.is_empty() {
            self.api_prefix.clone()
        } else {
            format!("{}{}", self.path_mapping, self.api_prefix)
        }
    }
}

/// Reads the stage name, but only when the host headers carry the
/// managed-domain markers; a custom domain hides the stage from the
/// request URL, so its stage name must not leak into the prefix.
fn detect_stage(event: &GatewayEvent) -> String {
    let host = event.forwarded_host();
    if MANAGED_DOMAIN_MARKERS
        .iter()
        .all(|marker| host.contains(marker))
    {
        event.stage().unwrap_or("").to_string()
    } else {
        String::new()
    }
}

/// Resolves the logical request path.
///
/// A greedy resource template hands the routable remainder over in the
/// path parameters; everything else uses the raw path. A greedy
/// template whose value the gateway did not resolve falls back to the
/// raw path as well.
fn resolve_path(event: &GatewayEvent) -> Option<String> {
    let resource = event.resource.as_deref().unwrap_or("/");
    if let Some(caps) = PROXY_PATTERN.captures(resource) {
        let value = event
            .path_parameters
            .as_ref()
            .and_then(|params| params.get(&caps["name"]));
        if let Some(value) = value {
            return Some(format!("/{value}"));
        }
    }

    event.path.clone()
}
