//! # lambda-proxy-rs-routing
//!
//! Route compilation and lookup for the lambda-proxy-rs framework: path
//! templates with typed placeholders, an ordered first-match-wins route
//! table, and typed extraction of path arguments.
//!
//! ## Modules
//!
//! - [`pattern`] - Template tokenizer and compiler
//! - [`convert`] - Typed values and argument extraction
//! - [`table`] - Ordered route table
//!
//! Templates use angle-bracket placeholders:
//!
//! ```
//! use http::Method;
//! use lambda_proxy_rs_routing::{extract_arguments, RouteTable};
//!
//! let mut table: RouteTable<&str> = RouteTable::new();
//! table
//!     .register("/test/<string:user>/<int:id>", vec![Method::GET], "view")
//!     .unwrap();
//!
//! let entry = table.resolve("/test/remote/42", &Method::GET).unwrap();
//! let args = extract_arguments(entry.pattern(), "/test/remote/42").unwrap();
//! assert_eq!(args["id"].as_i64(), Some(42));
//! ```

pub mod convert;
pub mod pattern;
pub mod table;

// Re-export the most commonly used types at the crate root.
pub use convert::{convert, extract_arguments, ParamValue};
pub use pattern::{compile, CompiledPattern, ParamKind, ParamSpec, Token};
pub use table::{RouteEntry, RouteTable};
