//! HTML shells for the bundled documentation UIs.
//!
//! Both pages are single self-contained documents that pull the UI
//! assets from a CDN and point them at the deployment's OpenAPI
//! document, so they work from any mount prefix.

/// Renders the Swagger UI page for the given OpenAPI document URL.
pub fn swagger(openapi_url: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<link type="text/css" rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@3/swagger-ui.css">
<title>{title}</title>
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@3/swagger-ui-bundle.js"></script>
<script>
const ui = SwaggerUIBundle({{
    url: '{openapi_url}',
    oauth2RedirectUrl: window.location.origin + '/docs/oauth2-redirect',
    dom_id: '#swagger-ui',
    presets: [
        SwaggerUIBundle.presets.apis,
        SwaggerUIBundle.SwaggerUIStandalonePreset
    ],
    layout: "BaseLayout",
    deepLinking: true
}})
</script>
</body>
</html>"#
    )
}

/// Renders the ReDoc page for the given OpenAPI document URL.
pub fn redoc(openapi_url: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{title}</title>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link href="https://fonts.googleapis.com/css?family=Montserrat:300,400,700|Roboto:300,400,700" rel="stylesheet">
<style>body {{ margin: 0; padding: 0; }}</style>
</head>
<body>
<redoc spec-url="{openapi_url}"></redoc>
<script src="https://cdn.jsdelivr.net/npm/redoc@next/bundles/redoc.standalone.js"></script>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_embeds_url_and_title() {
        let html = swagger("/production/openapi.json", "test - Swagger UI");
        assert!(html.contains("url: '/production/openapi.json'"));
        assert!(html.contains("<title>test - Swagger UI</title>"));
        assert!(html.contains("SwaggerUIBundle"));
    }

    #[test]
    fn test_redoc_embeds_url_and_title() {
        let html = redoc("/openapi.json", "test - ReDoc");
        assert!(html.contains(r#"spec-url="/openapi.json""#));
        assert!(html.contains("<title>test - ReDoc</title>"));
        assert!(html.contains("redoc.standalone.js"));
    }
}
