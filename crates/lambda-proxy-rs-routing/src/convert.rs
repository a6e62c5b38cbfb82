//! Typed conversion of captured path values.
//!
//! The match expression guarantees the shape of most captures (an `int`
//! group only ever captures digits), so conversion normally cannot fail.
//! The float group is the exception: its unescaped dot lets text like
//! `1x5` through the matcher, and conversion then reports a classified
//! [`ProxyError::ValueConversion`] instead of crashing.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use lambda_proxy_rs_core::{ProxyError, ProxyResult};

use crate::pattern::{CompiledPattern, ParamKind, ParamSpec};

/// A path or query argument after type conversion.
///
/// Serializes untagged, so an `Int(42)` is the JSON number `42` and a
/// `Str("pixel")` is the JSON string `"pixel"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// From an `int` placeholder.
    Int(i64),
    /// From a `float` placeholder.
    Float(f64),
    /// From every other placeholder kind, and from query parameters.
    Str(String),
}

impl ParamValue {
    /// Returns the string contents for `Str` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer contents for `Int` values.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float contents for `Float` values.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Converts captured text according to its placeholder kind.
///
/// `int` and `float` placeholders parse into numbers; every other kind
/// passes the text through unchanged.
///
/// # Errors
///
/// Returns [`ProxyError::ValueConversion`] when the captured text does
/// not parse as the declared numeric type.
pub fn convert(raw: &str, spec: &ParamSpec) -> ProxyResult<ParamValue> {
    match spec.kind {
        ParamKind::Int => raw.parse::<i64>().map(ParamValue::Int).map_err(|_| {
            ProxyError::ValueConversion {
                name: spec.name.clone(),
                value: raw.to_string(),
                expected: "int",
            }
        }),
        ParamKind::Float => raw.parse::<f64>().map(ParamValue::Float).map_err(|_| {
            ProxyError::ValueConversion {
                name: spec.name.clone(),
                value: raw.to_string(),
                expected: "float",
            }
        }),
        _ => Ok(ParamValue::Str(raw.to_string())),
    }
}

/// Extracts typed arguments for a path that matched `pattern`.
///
/// Captured groups are paired with parameter descriptors by position. A
/// capture whose text is literally identical to its own placeholder
/// source is dropped as a pair, so the remaining captures stay bound to
/// the right names. A path that does not match yields an empty mapping.
///
/// # Errors
///
/// Returns [`ProxyError::ValueConversion`] when a capture fails numeric
/// conversion.
pub fn extract_arguments(
    pattern: &CompiledPattern,
    path: &str,
) -> ProxyResult<HashMap<String, ParamValue>> {
    let mut args = HashMap::new();

    let Some(caps) = pattern.regex().captures(path) else {
        return Ok(args);
    };

    for (idx, spec) in pattern.params().iter().enumerate() {
        let Some(group) = caps.get(idx + 1) else {
            continue;
        };
        let raw = group.as_str();
        if raw == spec.source {
            continue;
        }
        args.insert(spec.name.clone(), convert(raw, spec)?);
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    fn spec(name: &str, kind: ParamKind) -> ParamSpec {
        ParamSpec {
            name: name.to_string(),
            source: format!("<{name}>"),
            kind,
        }
    }

    #[test]
    fn test_convert_int() {
        let value = convert("1234", &spec("id", ParamKind::Int)).unwrap();
        assert_eq!(value, ParamValue::Int(1234));
    }

    #[test]
    fn test_convert_float() {
        let value = convert("-1.5", &spec("x", ParamKind::Float)).unwrap();
        assert_eq!(value, ParamValue::Float(-1.5));
    }

    #[test]
    fn test_convert_passthrough_kinds() {
        for kind in [
            ParamKind::Default,
            ParamKind::String,
            ParamKind::Uuid,
            ParamKind::Regex("[a-z]+".to_string()),
        ] {
            let value = convert("remote", &spec("v", kind)).unwrap();
            assert_eq!(value, ParamValue::Str("remote".to_string()));
        }
    }

    #[test]
    fn test_convert_float_quirk_classified() {
        // "1x5" passes the match expression (unescaped dot) but is not
        // a number; the failure must surface as a 400-class error.
        let err = convert("1x5", &spec("x", ParamKind::Float)).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(matches!(
            err,
            ProxyError::ValueConversion { ref name, ref value, expected }
                if name == "x" && value == "1x5" && expected == "float"
        ));
    }

    #[test]
    fn test_convert_int_overflow_classified() {
        let err = convert("99999999999999999999", &spec("id", ParamKind::Int)).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_extract_strings() {
        let pattern = compile("/test/<string:user>/<name>").unwrap();
        let args = extract_arguments(&pattern, "/test/remote/pixel").unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args["user"], ParamValue::Str("remote".to_string()));
        assert_eq!(args["name"], ParamValue::Str("pixel".to_string()));
    }

    #[test]
    fn test_extract_typed_values() {
        let pattern = compile("/p/<int:num>/<float:fl>/<uuid:id>").unwrap();
        let args = extract_arguments(
            &pattern,
            "/p/1234/-1.0/6b0d1f74-8f81-11e8-83fd-6a0003389b00",
        )
        .unwrap();
        assert_eq!(args["num"], ParamValue::Int(1234));
        assert_eq!(args["fl"], ParamValue::Float(-1.0));
        assert_eq!(
            args["id"],
            ParamValue::Str("6b0d1f74-8f81-11e8-83fd-6a0003389b00".to_string())
        );
    }

    #[test]
    fn test_extract_no_match_is_empty() {
        let pattern = compile("/test/<int:id>").unwrap();
        let args = extract_arguments(&pattern, "/other/1").unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_extract_skips_template_echo() {
        // A client can send the placeholder text itself when the inline
        // pattern is permissive; the echoed capture yields no argument.
        let pattern = compile("/a/<regex(.+):x>").unwrap();
        let args = extract_arguments(&pattern, "/a/<regex(.+):x>").unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_extract_skip_keeps_alignment() {
        let pattern = compile("/a/<regex(.+):x>/<int:n>").unwrap();
        let args = extract_arguments(&pattern, "/a/<regex(.+):x>/42").unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args["n"], ParamValue::Int(42));
        assert!(!args.contains_key("x"));
    }

    #[test]
    fn test_value_serialization() {
        assert_eq!(
            serde_json::to_value(ParamValue::Int(42)).unwrap(),
            serde_json::json!(42)
        );
        assert_eq!(
            serde_json::to_value(ParamValue::Float(1.5)).unwrap(),
            serde_json::json!(1.5)
        );
        assert_eq!(
            serde_json::to_value(ParamValue::Str("pixel".to_string())).unwrap(),
            serde_json::json!("pixel")
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ParamValue::Int(42).to_string(), "42");
        assert_eq!(ParamValue::Str("a".into()).to_string(), "a");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(ParamValue::Int(7).as_i64(), Some(7));
        assert_eq!(ParamValue::Int(7).as_str(), None);
        assert_eq!(ParamValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(ParamValue::Str("x".into()).as_str(), Some("x"));
    }
}
