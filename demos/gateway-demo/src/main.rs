//! # lambda-proxy-rs Gateway Demo
//!
//! A demo application exercising the framework end to end:
//!
//! - **Routes**: literal paths, typed placeholders, inline regex patterns
//! - **Options**: CORS, payload compression, base64 binary encoding
//! - **Bodies**: a POST route echoing the request body
//! - **Docs**: `/openapi.json`, `/docs` and `/redoc` come for free
//!
//! ## Running
//!
//! Feed it a proxy-integration event as JSON, from a file or stdin:
//!
//! ```bash
//! echo '{"httpMethod": "GET", "path": "/json", "headers": {}}' \
//!     | cargo run --package gateway-demo
//! cargo run --package gateway-demo -- --event fixtures/event.json
//! ```
//!
//! The gateway response envelope is printed to stdout.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use lambda_proxy_rs::http::StatusCode;
use lambda_proxy_rs::{Api, GatewayEvent, ProxyResult, Response, RouteOptions, Settings};

const SAMPLE_PAYLOAD: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

fn text(body: impl Into<String>) -> Response {
    Response::new(StatusCode::OK, "text/plain", body.into())
}

fn build_app() -> ProxyResult<Api> {
    let mut app = Api::new(Settings::new("demo").debug(true))?;

    app.get("/", RouteOptions::new().cors(true), |_| Ok(text("Yo")))?;

    app.get(
        "/<regex([0-9]{2}-[a-zA-Z]{5}):code>",
        RouteOptions::new().cors(true),
        |request| {
            let code = request.arg("code").map(ToString::to_string).unwrap_or_default();
            Ok(text(code))
        },
    )?;

    app.post("/people", RouteOptions::new().cors(true), |request| {
        Ok(text(request.body().unwrap_or("").to_string()))
    })?;

    app.get("/people", RouteOptions::new().cors(true), |_| Ok(text("Nope")))?;

    app.get(
        "/<string:user>/<int:num>",
        RouteOptions::new().cors(true),
        |request| {
            let user = request.arg("user").map(ToString::to_string).unwrap_or_default();
            let num = request.arg("num").and_then(|value| value.as_i64()).unwrap_or(0);
            Ok(text(format!("{user}-{num}")))
        },
    )?;

    app.get("/json", RouteOptions::new().cors(true), |_| {
        Response::json(&json!({"app": "it works"}))
    })?;

    app.get(
        "/binary",
        RouteOptions::new()
            .cors(true)
            .payload_compression("gzip")
            .binary_b64encode(true),
        |_| {
            Ok(Response::new(
                StatusCode::OK,
                "application/octet-stream",
                SAMPLE_PAYLOAD.to_vec(),
            ))
        },
    )?;

    Ok(app)
}

/// Dispatch a proxy-integration event against the demo application.
#[derive(Parser)]
#[command(name = "gateway-demo")]
struct Args {
    /// Path to a JSON event file; reads stdin when omitted.
    #[arg(long)]
    event: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let payload = match args.event {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let event: GatewayEvent = serde_json::from_str(&payload)?;
    let app = build_app()?;
    let response = app.handle(event, None);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use lambda_proxy_rs::http::Method;

    use super::*;

    #[test]
    fn test_demo_routes_dispatch() {
        let app = build_app().unwrap();

        let event = GatewayEvent::builder(Method::GET, "/json").build();
        let response = app.handle(event, None);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"app":"it works"}"#);

        let event = GatewayEvent::builder(Method::GET, "/remote/42").build();
        let response = app.handle(event, None);
        assert_eq!(response.body, "remote-42");

        let event = GatewayEvent::builder(Method::GET, "/12-alpha").build();
        let response = app.handle(event, None);
        assert_eq!(response.body, "12-alpha");
    }
}
