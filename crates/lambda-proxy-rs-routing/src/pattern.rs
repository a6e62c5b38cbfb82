//! Path template parsing and compilation.
//!
//! A path template describes one route using a fixed placeholder grammar:
//!
//! | Placeholder | Capture group | Extracted type |
//! |---|---|---|
//! | `<name>` | `([a-zA-Z0-9_]+)` | string |
//! | `<string:name>` | `([a-zA-Z0-9_]+)` | string |
//! | `<int:name>` | `([0-9]+)` | integer |
//! | `<float:name>` | `([+-]?[0-9]+.[0-9]+)` | float |
//! | `<uuid:name>` | 8-4-4-4-12 lower-case hex | string |
//! | `<regex(pattern):name>` | `(pattern)` verbatim | string |
//!
//! Templates are tokenized in a single pass, and the match expression and
//! the documentation path are each assembled from the token sequence by an
//! independent pure function. The match expression is anchored at both
//! ends, so a route matches whole paths only.
//!
//! Two long-standing grammar quirks are kept on purpose: the float group
//! leaves its dot unescaped (it matches any character in that position),
//! and literal template text is copied into the match expression without
//! regex escaping.

use std::fmt;
use std::fmt::Write as _;

use regex::Regex;

use lambda_proxy_rs_core::{ProxyError, ProxyResult};

/// The placeholder kinds understood by the template grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// `<name>` with no type prefix.
    Default,
    /// `<string:name>`.
    String,
    /// `<int:name>`.
    Int,
    /// `<float:name>`.
    Float,
    /// `<uuid:name>`.
    Uuid,
    /// `<regex(pattern):name>`, holding the inline sub-expression.
    Regex(String),
}

impl ParamKind {
    /// Returns the capture-group body substituted for this kind.
    pub fn group(&self) -> &str {
        match self {
            Self::Default | Self::String => "[a-zA-Z0-9_]+",
            Self::Int => "[0-9]+",
            // The dot is intentionally unescaped.
            Self::Float => "[+-]?[0-9]+.[0-9]+",
            Self::Uuid => "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
            Self::Regex(pattern) => pattern,
        }
    }

    /// Returns the type name used in conversion errors and documentation.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Uuid => "uuid",
            Self::Regex(_) => "regex",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single placeholder parsed from a path template.
///
/// Descriptors are produced once at compile time, in left-to-right order
/// of appearance, and are immutable thereafter. Captured groups are paired
/// with descriptors by position during argument extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// The parameter name; becomes the argument key on a match.
    pub name: String,
    /// The declared kind.
    pub kind: ParamKind,
    /// The placeholder exactly as written in the template, brackets included.
    pub source: String,
}

/// One lexical unit of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, copied through unchanged.
    Literal(String),
    /// A typed placeholder.
    Param(ParamSpec),
}

/// Splits placeholder text on its type separator.
///
/// The name is the text after the last colon, so an inline regex body may
/// itself contain colons. Returns `(None, inner)` when there is no colon.
fn split_type_and_name(inner: &str) -> (Option<&str>, &str) {
    inner
        .rfind(':')
        .map_or((None, inner), |pos| (Some(&inner[..pos]), &inner[pos + 1..]))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Parses the text between `<` and `>` into a name and kind.
///
/// Returns `None` when the text is not a recognized placeholder; the
/// caller keeps the run as literal text so unrecognized syntax flows
/// through unchanged instead of failing.
fn parse_placeholder(inner: &str) -> ProxyResult<Option<(String, ParamKind)>> {
    let (type_part, name) = split_type_and_name(inner);

    if !is_valid_name(name) {
        return Ok(None);
    }

    let Some(type_part) = type_part else {
        return Ok(Some((name.to_string(), ParamKind::Default)));
    };

    // A parenthesized suffix holds an inline pattern: `regex(...)`.
    let (word, inline) = match (type_part.find('('), type_part.ends_with(')')) {
        (Some(open), true) => (
            &type_part[..open],
            Some(&type_part[open + 1..type_part.len() - 1]),
        ),
        _ => (type_part, None),
    };

    if !is_valid_name(word) {
        return Ok(None);
    }

    let kind = match word {
        "string" => ParamKind::String,
        "int" => ParamKind::Int,
        "float" => ParamKind::Float,
        "uuid" => ParamKind::Uuid,
        "regex" => match inline {
            Some(pattern) if !pattern.is_empty() => ParamKind::Regex(pattern.to_string()),
            _ => {
                return Err(ProxyError::Compile {
                    template: format!("<{inner}>"),
                    reason: "regex placeholder requires an inline pattern".to_string(),
                })
            }
        },
        // Unknown type keywords stay literal.
        _ => return Ok(None),
    };

    Ok(Some((name.to_string(), kind)))
}

/// Tokenizes a path template in a single left-to-right pass.
///
/// Literal runs and placeholders alternate in the output. Text between
/// angle brackets that is not a recognized placeholder is kept as a
/// literal run and yields no descriptor.
///
/// # Errors
///
/// Returns [`ProxyError::Compile`] if a `<` is never closed or a regex
/// placeholder lacks its inline pattern.
pub fn tokenize(template: &str) -> ProxyResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut remaining = template;

    while !remaining.is_empty() {
        let Some(start) = remaining.find('<') else {
            tokens.push(Token::Literal(remaining.to_string()));
            break;
        };

        if start > 0 {
            tokens.push(Token::Literal(remaining[..start].to_string()));
        }

        let end = remaining[start..].find('>').ok_or_else(|| ProxyError::Compile {
            template: template.to_string(),
            reason: "unclosed angle bracket".to_string(),
        })? + start;

        let source = &remaining[start..=end];
        let inner = &remaining[start + 1..end];

        match parse_placeholder(inner).map_err(|err| match err {
            ProxyError::Compile { reason, .. } => ProxyError::Compile {
                template: template.to_string(),
                reason,
            },
            other => other,
        })? {
            Some((name, kind)) => tokens.push(Token::Param(ParamSpec {
                name,
                kind,
                source: source.to_string(),
            })),
            None => tokens.push(Token::Literal(source.to_string())),
        }

        remaining = &remaining[end + 1..];
    }

    Ok(tokens)
}

/// Assembles the anchored match expression for a token sequence.
///
/// Literal runs are copied verbatim (not regex-escaped), placeholders
/// become unnamed capture groups.
pub fn match_expression(tokens: &[Token]) -> String {
    let mut expr = String::from("^");
    for token in tokens {
        match token {
            Token::Literal(text) => expr.push_str(text),
            Token::Param(spec) => {
                write!(expr, "({})", spec.kind.group()).ok();
            }
        }
    }
    expr.push('$');
    expr
}

/// Assembles the documentation form of a token sequence.
///
/// Every placeholder is rewritten to `{name}`; all other characters are
/// unchanged. Inline regex bodies cannot corrupt the rewrite because the
/// tokenizer already isolated them.
pub fn documentation_path(tokens: &[Token]) -> String {
    let mut path = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => path.push_str(text),
            Token::Param(spec) => {
                write!(path, "{{{}}}", spec.name).ok();
            }
        }
    }
    path
}

/// A path template compiled into its matching and documentation forms.
///
/// Created once at registration time and immutable for the life of the
/// process; matching against it is a read-only operation safe for
/// concurrent use.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    regex: Regex,
    params: Vec<ParamSpec>,
    openapi_path: String,
}

impl CompiledPattern {
    /// Returns the original template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the compiled match expression.
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the parameter descriptors in template order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Returns the documentation form of the template.
    pub fn openapi_path(&self) -> &str {
        &self.openapi_path
    }

    /// Returns `true` if the whole path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compiles a path template.
///
/// # Errors
///
/// Returns [`ProxyError::Compile`] when the template has an unclosed
/// bracket, a regex placeholder without an inline pattern, a duplicate
/// parameter name, an inline pattern the regex engine rejects, or an
/// inline pattern that adds capture groups of its own (use `(?:...)`
/// for grouping inside an inline pattern).
///
/// # Examples
///
/// ```
/// use lambda_proxy_rs_routing::pattern::compile;
///
/// let pattern = compile("/test/<string:user>/<int:id>").unwrap();
/// assert!(pattern.matches("/test/remote/42"));
/// assert!(!pattern.matches("/test/remote/42/extra"));
/// assert_eq!(pattern.openapi_path(), "/test/{user}/{id}");
/// ```
pub fn compile(template: &str) -> ProxyResult<CompiledPattern> {
    let tokens = tokenize(template)?;

    let params: Vec<ParamSpec> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Param(spec) => Some(spec.clone()),
            Token::Literal(_) => None,
        })
        .collect();

    for (idx, spec) in params.iter().enumerate() {
        if params[..idx].iter().any(|prev| prev.name == spec.name) {
            return Err(ProxyError::Compile {
                template: template.to_string(),
                reason: format!("duplicate parameter name '{}'", spec.name),
            });
        }
    }

    let expr = match_expression(&tokens);
    let regex = Regex::new(&expr).map_err(|err| ProxyError::Compile {
        template: template.to_string(),
        reason: err.to_string(),
    })?;

    // Capture groups must line up one-to-one with descriptors, otherwise
    // extraction would bind values to the wrong names.
    if regex.captures_len() != params.len() + 1 {
        return Err(ProxyError::Compile {
            template: template.to_string(),
            reason: "inline pattern must not add capture groups; use (?:...) instead".to_string(),
        });
    }

    Ok(CompiledPattern {
        template: template.to_string(),
        regex,
        params,
        openapi_path: documentation_path(&tokens),
    })
}
