//! Core error types for the lambda-proxy-rs workspace.
//!
//! This module provides [`ProxyError`], covering both registration-time
//! failures (invalid templates, duplicate routes, bad options) and
//! request-time conditions (unresolvable paths, unmatched routes, value
//! conversion failures). Registration-time variants are meant to abort
//! application setup; request-time variants are classified into a gateway
//! response by the dispatcher.

use thiserror::Error;

/// The primary error type for the lambda-proxy-rs workspace.
///
/// Each variant maps to an HTTP status code via [`ProxyError::status_code`],
/// used when the dispatcher serializes the error into a gateway response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    // ── Registration errors ──────────────────────────────────────────

    /// A path template could not be compiled into a match expression.
    #[error("invalid route template \"{template}\": {reason}")]
    Compile {
        /// The offending template string.
        template: String,
        /// Why compilation failed.
        reason: String,
    },

    /// Two registrations collided on the same template string and method.
    #[error("Duplicate route detected: \"{template}\"\nURL paths must be unique.")]
    DuplicateRoute {
        /// The template string both registrations used.
        template: String,
    },

    /// An unrecognized registration option, such as an unsupported
    /// payload compression mode.
    #[error("{0}")]
    InvalidOption(String),

    // ── Request errors ───────────────────────────────────────────────

    /// The request path could not be determined from the gateway event.
    #[error("Missing or invalid path")]
    NoPathResolved,

    /// No registered route matches the request method and path.
    #[error("No view function for: {method} - {path}")]
    NoRouteMatched {
        /// The request HTTP method.
        method: String,
        /// The logical request path.
        path: String,
    },

    /// A captured path segment could not be converted to its declared type.
    #[error("invalid value for parameter '{name}': '{value}' is not a valid {expected}")]
    ValueConversion {
        /// The parameter name from the route template.
        name: String,
        /// The captured text that failed to convert.
        value: String,
        /// The declared target type.
        expected: &'static str,
    },

    /// The request body could not be decoded.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The access token supplied with the request did not validate.
    #[error("Invalid access token")]
    InvalidToken,

    /// The response layer was asked for a compression mode it does not know.
    #[error("Unsupported compression mode: {0}")]
    UnsupportedCompression(String),

    /// A route handler failed.
    #[error("{0}")]
    Handler(String),
}

impl ProxyError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// Request-time classification:
    ///
    /// - `NoPathResolved`, `NoRouteMatched`, `ValueConversion`,
    ///   `InvalidBody` -> 400
    /// - `InvalidToken`, `UnsupportedCompression`, `Handler` -> 500
    ///
    /// Registration-time variants map to 500; they abort setup and are
    /// never expected to reach a response in a correctly started process.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NoPathResolved
            | Self::NoRouteMatched { .. }
            | Self::ValueConversion { .. }
            | Self::InvalidBody(_) => 400,
            Self::Compile { .. }
            | Self::DuplicateRoute { .. }
            | Self::InvalidOption(_)
            | Self::InvalidToken
            | Self::UnsupportedCompression(_)
            | Self::Handler(_) => 500,
        }
    }

    /// Returns `true` for variants raised during route registration.
    pub const fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::Compile { .. } | Self::DuplicateRoute { .. } | Self::InvalidOption(_)
        )
    }
}

/// A convenience type alias for `Result<T, ProxyError>`.
pub type ProxyResult<T> = Result<T, ProxyError>;
