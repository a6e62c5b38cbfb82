//! Response types and the gateway envelope.
//!
//! Handlers return a [`Response`]; the dispatcher seals it into a
//! [`GatewayResponse`] with [`Response::into_gateway`], applying the
//! route's CORS, compression, cache and binary-encoding settings in
//! that order.

use std::collections::BTreeMap;
use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use lambda_proxy_rs_core::{ProxyError, ProxyResult};

/// Content types treated as binary when base64 encoding is enabled.
pub const BINARY_TYPES: [&str; 10] = [
    "application/octet-stream",
    "application/x-protobuf",
    "application/x-tar",
    "application/zip",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/tiff",
    "image/webp",
    "image/jp2",
];

/// A response body, before envelope encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

impl Body {
    /// Returns the body content as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    fn into_envelope_text(self) -> String {
        match self {
            Self::Text(text) => text,
            // A binary body that skips base64 encoding cannot survive the
            // JSON envelope intact; it degrades to lossy UTF-8.
            Self::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<&[u8]> for Body {
    fn from(value: &[u8]) -> Self {
        Self::Binary(value.to_vec())
    }
}

/// A handler response: status, content type, body and custom headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    content_type: String,
    body: Body,
    headers: BTreeMap<String, String>,
}

impl Response {
    /// Creates a response with the given status, content type and body.
    pub fn new(status: StatusCode, content_type: impl Into<String>, body: impl Into<Body>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Creates a 200 response with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Handler`] when the value cannot be
    /// serialized.
    pub fn json<T: Serialize>(value: &T) -> ProxyResult<Self> {
        let body = serde_json::to_string(value).map_err(|err| ProxyError::Handler(err.to_string()))?;
        Ok(Self::new(StatusCode::OK, "application/json", body))
    }

    /// Creates a 200 response with an HTML body.
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, "text/html", body.into())
    }

    /// Creates the JSON error envelope for a classified error.
    ///
    /// Every variant reports under the `errorMessage` key except the
    /// access-token failure, which historically uses `message`.
    pub fn from_error(err: &ProxyError) -> Self {
        let body = match err {
            ProxyError::InvalidToken => serde_json::json!({"message": err.to_string()}),
            _ => serde_json::json!({"errorMessage": err.to_string()}),
        };
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, "application/json", body.to_string())
    }

    /// Adds a custom header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the body.
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Seals this response into the gateway envelope.
    ///
    /// Header assembly order: custom headers, `Content-Type`, CORS,
    /// `Content-Encoding` (when compression applies), `Cache-Control`.
    /// Compression runs only when the route configured a mode and the
    /// client's accept-encoding header mentions it; an unrecognized
    /// configured mode collapses the whole response into a 500 envelope.
    /// A `ttl` takes precedence over `cache_control`; both emit
    /// `no-cache` for non-200 statuses.
    pub fn into_gateway(self, settings: &ResponseSettings<'_>) -> GatewayResponse {
        let Self {
            status,
            content_type,
            body,
            headers: mut all_headers,
        } = self;

        all_headers.insert("Content-Type".to_string(), content_type.clone());

        if settings.cors {
            all_headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
            all_headers.insert(
                "Access-Control-Allow-Methods".to_string(),
                settings
                    .accepted_methods
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            );
            all_headers.insert(
                "Access-Control-Allow-Credentials".to_string(),
                "true".to_string(),
            );
        }

        let mut body = body;
        if let Some(mode) = settings.compression {
            if settings.accepted_compression.contains(mode) {
                all_headers.insert("Content-Encoding".to_string(), mode.to_string());
                match compress_payload(mode, body.as_bytes()) {
                    Some(compressed) => body = Body::Binary(compressed),
                    None => {
                        return Self::from_error(&ProxyError::UnsupportedCompression(
                            mode.to_string(),
                        ))
                        .into_gateway(&ResponseSettings::default());
                    }
                }
            }
        }

        if let Some(ttl) = settings.ttl.filter(|ttl| *ttl > 0) {
            let value = if status == StatusCode::OK {
                format!("max-age={ttl}")
            } else {
                "no-cache".to_string()
            };
            all_headers.insert("Cache-Control".to_string(), value);
        } else if let Some(cache_control) = settings.cache_control.filter(|v| !v.is_empty()) {
            let value = if status == StatusCode::OK {
                cache_control.to_string()
            } else {
                "no-cache".to_string()
            };
            all_headers.insert("Cache-Control".to_string(), value);
        }

        let binary =
            matches!(body, Body::Binary(_)) || BINARY_TYPES.contains(&content_type.as_str());
        let (body, is_base64_encoded) = if binary && settings.b64encode {
            (STANDARD.encode(body.as_bytes()), Some(true))
        } else {
            (body.into_envelope_text(), None)
        };

        GatewayResponse {
            status_code: status.as_u16(),
            headers: all_headers,
            body,
            is_base64_encoded,
        }
    }
}

/// Per-route settings applied when sealing a response.
///
/// The default value applies no CORS, compression or cache headers and
/// is what error responses produced before route resolution use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSettings<'a> {
    /// Emit CORS headers.
    pub cors: bool,
    /// Methods advertised in `Access-Control-Allow-Methods`.
    pub accepted_methods: &'a [Method],
    /// The client's accept-encoding header value.
    pub accepted_compression: &'a str,
    /// The compression mode configured on the route.
    pub compression: Option<&'a str>,
    /// Base64-encode binary payloads.
    pub b64encode: bool,
    /// Cache lifetime for 200 responses, in seconds.
    pub ttl: Option<u32>,
    /// Literal `Cache-Control` value for 200 responses.
    pub cache_control: Option<&'a str>,
}

/// The proxy-integration response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body, base64-encoded when the flag is set.
    pub body: String,
    /// Present and `true` only when the body is base64-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_base64_encoded: Option<bool>,
}

/// Compresses `data` with one of the supported envelope modes.
///
/// gzip wraps a gzip container, zlib a zlib container, and deflate emits
/// a raw stream; all at the highest compression level. Returns `None`
/// for unknown modes.
fn compress_payload(mode: &str, data: &[u8]) -> Option<Vec<u8>> {
    match mode {
        "gzip" => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(data).ok()?;
            encoder.finish().ok()
        }
        "zlib" => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(data).ok()?;
            encoder.finish().ok()
        }
        "deflate" => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
            encoder.write_all(data).ok()?;
            encoder.finish().ok()
        }
        _ => None,
    }
}
