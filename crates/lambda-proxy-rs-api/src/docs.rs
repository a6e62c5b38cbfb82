//! OpenAPI document generation.
//!
//! Builds an OpenAPI 3.0.2 description of the registered routes. Path
//! parameters come from the compiled route patterns, so the document
//! always agrees with what the dispatcher actually matches. The
//! documentation routes themselves are regular routes and show up in
//! the output like any other.

use serde_json::{json, Map, Value};

use lambda_proxy_rs_core::Settings;
use lambda_proxy_rs_routing::{ParamKind, ParamSpec, RouteTable};

use crate::api::Route;

const OPENAPI_VERSION: &str = "3.0.2";

/// Builds the OpenAPI document for the given route table.
///
/// `openapi_prefix` is prepended to every path key so the document
/// stays navigable when the application is mounted behind a stage or
/// a custom base path. Operation ids are left unprefixed.
pub(crate) fn openapi_document(
    settings: &Settings,
    routes: &RouteTable<Route>,
    openapi_prefix: &str,
) -> Value {
    let mut info = Map::new();
    info.insert("title".to_string(), json!(settings.name));
    info.insert("version".to_string(), json!(settings.version));
    if let Some(description) = &settings.description {
        info.insert("description".to_string(), json!(description));
    }

    let mut needs_security_scheme = false;
    let mut paths = Map::new();

    for entry in routes.iter() {
        let route = entry.handler();

        let mut base = Map::new();
        if !route.options.tags.is_empty() {
            base.insert("tags".to_string(), json!(route.options.tags));
        }
        if let Some(description) = &route.options.description {
            base.insert("description".to_string(), json!(description));
        }
        if route.options.token {
            needs_security_scheme = true;
            base.insert("security".to_string(), json!([{"access_token": []}]));
        }

        let parameters = path_parameters(entry.pattern().params());
        if !parameters.is_empty() {
            base.insert("parameters".to_string(), Value::Array(parameters));
        }
        base.insert(
            "responses".to_string(),
            json!({
                "400": {"description": "Not found"},
                "500": {"description": "Internal error"},
            }),
        );

        let openapi_path = entry.pattern().openapi_path();
        let document_path = format!("{openapi_prefix}{openapi_path}");
        let operations = paths
            .entry(document_path)
            .or_insert_with(|| Value::Object(Map::new()));

        for method in entry.methods() {
            let mut operation = base.clone();
            operation.insert("operationId".to_string(), json!(openapi_path));
            if matches!(method.as_str(), "PUT" | "POST" | "DELETE" | "PATCH") {
                operation.insert(
                    "requestBody".to_string(),
                    json!({
                        "description": "Body",
                        "content": {"*/*": {}},
                        "required": false,
                    }),
                );
            }
            if let Some(operations) = operations.as_object_mut() {
                operations.insert(method.as_str().to_lowercase(), Value::Object(operation));
            }
        }
    }

    let mut output = Map::new();
    output.insert("openapi".to_string(), json!(OPENAPI_VERSION));
    output.insert("info".to_string(), Value::Object(info));
    if needs_security_scheme {
        output.insert(
            "components".to_string(),
            json!({
                "securitySchemes": {
                    "access_token": {
                        "type": "apiKey",
                        "description": "Simple token authentification",
                        "in": "query",
                        "name": "access_token",
                    }
                }
            }),
        );
    }
    output.insert("paths".to_string(), Value::Object(paths));
    Value::Object(output)
}

fn path_parameters(params: &[ParamSpec]) -> Vec<Value> {
    params
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "in": "path",
                "required": true,
                "schema": schema_for(&spec.kind),
            })
        })
        .collect()
}

fn schema_for(kind: &ParamKind) -> Value {
    match kind {
        ParamKind::Default | ParamKind::String => json!({"type": "string"}),
        ParamKind::Int => json!({"type": "integer"}),
        ParamKind::Float => json!({"type": "number", "format": "float"}),
        ParamKind::Uuid => json!({"type": "string", "format": "uuid"}),
        ParamKind::Regex(pattern) => {
            json!({"type": "string", "pattern": format!("^{pattern}$")})
        }
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use crate::api::{Api, RouteOptions};
    use crate::response::Response;

    use super::*;

    fn ok_handler(_: crate::request::Request) -> lambda_proxy_rs_core::ProxyResult<Response> {
        Ok(Response::new(StatusCode::OK, "text/plain", "ok"))
    }

    fn quiet_api() -> Api {
        Api::new(Settings::new("test").configure_logs(false)).unwrap()
    }

    fn bare_api() -> Api {
        Api::new(Settings::new("test").configure_logs(false).add_docs(false)).unwrap()
    }

    #[test]
    fn test_document_skeleton() {
        let api = quiet_api();
        let doc = openapi_document(api.settings(), api.routes(), "");

        assert_eq!(doc["openapi"], "3.0.2");
        assert_eq!(doc["info"]["title"], "test");
        assert_eq!(doc["info"]["version"], "0.0.1");
        assert!(doc["info"].get("description").is_none());
        assert!(doc.get("components").is_none());

        // The documentation routes document themselves.
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(doc["paths"]["/openapi.json"]["get"]["tags"], json!(["documentation"]));
        assert_eq!(
            doc["paths"]["/docs"]["get"]["description"],
            "Display Swagger HTML UI."
        );
        assert_eq!(doc["paths"]["/redoc"]["get"]["operationId"], "/redoc");
    }

    #[test]
    fn test_info_description() {
        let api = Api::new(
            Settings::new("test")
                .configure_logs(false)
                .add_docs(false)
                .description("a test service"),
        )
        .unwrap();
        let doc = openapi_document(api.settings(), api.routes(), "");
        assert_eq!(doc["info"]["description"], "a test service");
    }

    #[test]
    fn test_path_parameters_and_request_body() {
        let mut api = bare_api();
        api.route(
            "/test/<string:user>/<int:num>",
            vec![Method::GET, Method::POST],
            RouteOptions::new().description("user record").tag("users"),
            ok_handler,
        )
        .unwrap();

        let doc = openapi_document(api.settings(), api.routes(), "");
        let operation = &doc["paths"]["/test/{user}/{num}"]["get"];

        assert_eq!(operation["operationId"], "/test/{user}/{num}");
        assert_eq!(operation["tags"], json!(["users"]));
        assert_eq!(operation["description"], "user record");
        assert_eq!(
            operation["parameters"],
            json!([
                {"name": "user", "in": "path", "required": true, "schema": {"type": "string"}},
                {"name": "num", "in": "path", "required": true, "schema": {"type": "integer"}},
            ])
        );
        assert_eq!(
            operation["responses"],
            json!({
                "400": {"description": "Not found"},
                "500": {"description": "Internal error"},
            })
        );
        assert!(operation.get("requestBody").is_none());

        let operation = &doc["paths"]["/test/{user}/{num}"]["post"];
        assert_eq!(
            operation["requestBody"],
            json!({"description": "Body", "content": {"*/*": {}}, "required": false})
        );
    }

    #[test]
    fn test_token_route_gets_security_scheme() {
        let mut api = bare_api();
        api.get("/secure", RouteOptions::new().token(true), ok_handler)
            .unwrap();
        api.get("/open", RouteOptions::new(), ok_handler).unwrap();

        let doc = openapi_document(api.settings(), api.routes(), "");
        assert_eq!(
            doc["components"]["securitySchemes"]["access_token"],
            json!({
                "type": "apiKey",
                "description": "Simple token authentification",
                "in": "query",
                "name": "access_token",
            })
        );
        assert_eq!(
            doc["paths"]["/secure"]["get"]["security"],
            json!([{"access_token": []}])
        );
        assert!(doc["paths"]["/open"]["get"].get("security").is_none());
    }

    #[test]
    fn test_prefix_applies_to_paths_only() {
        let mut api = bare_api();
        api.get("/test/<id>", RouteOptions::new(), ok_handler).unwrap();

        let doc = openapi_document(api.settings(), api.routes(), "/production");
        let operation = &doc["paths"]["/production/test/{id}"]["get"];
        assert_eq!(operation["operationId"], "/test/{id}");
    }

    #[test]
    fn test_typed_parameter_schemas() {
        let mut api = bare_api();
        api.get(
            "/t/<float:x>/<uuid:u>/<regex([0-9]{2}):code>",
            RouteOptions::new(),
            ok_handler,
        )
        .unwrap();

        let doc = openapi_document(api.settings(), api.routes(), "");
        let parameters = &doc["paths"]["/t/{x}/{u}/{code}"]["get"]["parameters"];
        assert_eq!(parameters[0]["schema"], json!({"type": "number", "format": "float"}));
        assert_eq!(parameters[1]["schema"], json!({"type": "string", "format": "uuid"}));
        assert_eq!(
            parameters[2]["schema"],
            json!({"type": "string", "pattern": "^[0-9]{2}$"})
        );
    }

    #[test]
    fn test_same_template_methods_merge() {
        let mut api = bare_api();
        api.get("/merge/<id>", RouteOptions::new(), ok_handler).unwrap();
        api.post("/merge/<id>", RouteOptions::new(), ok_handler).unwrap();

        let doc = openapi_document(api.settings(), api.routes(), "");
        let operations = doc["paths"]["/merge/{id}"].as_object().unwrap();
        assert_eq!(operations.len(), 2);
        assert!(operations.contains_key("get"));
        assert!(operations.contains_key("post"));
    }
}
