//! Ordered route table with first-match-wins lookup.
//!
//! The table is built once during application setup and is read-only
//! afterwards, so lookups need no synchronization. Resolution scans
//! entries in registration order and returns the first whose method set
//! and match expression both accept the request, which makes ordering a
//! caller responsibility: register specific templates before general
//! ones that could match the same concrete path.

use http::Method;

use lambda_proxy_rs_core::{ProxyError, ProxyResult};

use crate::pattern::{compile, CompiledPattern};

/// A registered route: its compiled pattern, accepted methods and the
/// payload attached at registration.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    template: String,
    pattern: CompiledPattern,
    methods: Vec<Method>,
    handler: H,
}

impl<H> RouteEntry<H> {
    /// Returns the template string as registered.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the compiled pattern.
    pub const fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns the accepted HTTP methods.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Returns the registration payload.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns `true` if the route accepts `method`.
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }
}

/// The route table.
///
/// Entries keep their registration order; [`RouteTable::resolve`] walks
/// them front to back.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<RouteEntry<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route.
    ///
    /// An empty method list defaults to GET. Duplicate detection compares
    /// the raw template string: a registration fails when an existing
    /// entry has the identical template and shares at least one method.
    /// Two different templates that compile to equivalent expressions are
    /// not duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::DuplicateRoute`] on a template and method
    /// collision, or [`ProxyError::Compile`] when the template is
    /// malformed.
    pub fn register(
        &mut self,
        template: &str,
        methods: Vec<Method>,
        handler: H,
    ) -> ProxyResult<()> {
        let methods = if methods.is_empty() {
            vec![Method::GET]
        } else {
            methods
        };

        for method in &methods {
            if self.is_registered(template, method) {
                return Err(ProxyError::DuplicateRoute {
                    template: template.to_string(),
                });
            }
        }

        let pattern = compile(template)?;
        self.routes.push(RouteEntry {
            template: template.to_string(),
            pattern,
            methods,
            handler,
        });
        Ok(())
    }

    fn is_registered(&self, template: &str, method: &Method) -> bool {
        self.routes
            .iter()
            .any(|route| route.template == template && route.allows(method))
    }

    /// Returns the first route, in registration order, that accepts
    /// `method` and whose expression fully matches `path`.
    pub fn resolve(&self, path: &str, method: &Method) -> Option<&RouteEntry<H>> {
        self.routes
            .iter()
            .find(|route| route.allows(method) && route.pattern.matches(path))
    }

    /// Iterates over the entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry<H>> {
        self.routes.iter()
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` when no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(entries: &[(&str, Vec<Method>)]) -> RouteTable<usize> {
        let mut table = RouteTable::new();
        for (idx, (template, methods)) in entries.iter().enumerate() {
            table.register(template, methods.clone(), idx).unwrap();
        }
        table
    }

    #[test]
    fn test_resolve_simple() {
        let table = table_with(&[("/test/<user>", vec![Method::GET])]);
        let entry = table.resolve("/test/remote", &Method::GET).unwrap();
        assert_eq!(entry.template(), "/test/<user>");
        assert_eq!(*entry.handler(), 0);
    }

    #[test]
    fn test_resolve_respects_method() {
        let table = table_with(&[("/test/<user>", vec![Method::GET, Method::POST])]);
        assert!(table.resolve("/test/remote", &Method::POST).is_some());
        assert!(table.resolve("/test/remote", &Method::DELETE).is_none());
    }

    #[test]
    fn test_resolve_first_match_wins() {
        // Both templates match "/x/abc123"; the first registered wins.
        let table = table_with(&[
            ("/x/<regex([a-z]+[0-9]+):v>", vec![Method::GET]),
            ("/x/<v>", vec![Method::GET]),
        ]);
        let entry = table.resolve("/x/abc123", &Method::GET).unwrap();
        assert_eq!(*entry.handler(), 0);

        // A path only the general template accepts falls through to it.
        let entry = table.resolve("/x/abc", &Method::GET).unwrap();
        assert_eq!(*entry.handler(), 1);
    }

    #[test]
    fn test_resolve_registration_order_stable() {
        let table = table_with(&[
            ("/y/<a>", vec![Method::GET]),
            ("/y/<regex([a-z]+):b>", vec![Method::GET]),
        ]);
        // The general template was registered first and shadows the
        // specific one for every path both accept.
        let entry = table.resolve("/y/abc", &Method::GET).unwrap();
        assert_eq!(*entry.handler(), 0);
    }

    #[test]
    fn test_resolve_miss() {
        let table = table_with(&[("/test/<int:id>", vec![Method::GET])]);
        assert!(table.resolve("/test/abc", &Method::GET).is_none());
        assert!(table.resolve("/nope", &Method::GET).is_none());
    }

    #[test]
    fn test_empty_methods_default_to_get() {
        let mut table = RouteTable::new();
        table.register("/test", vec![], 0usize).unwrap();
        assert!(table.resolve("/test", &Method::GET).is_some());
        assert!(table.resolve("/test", &Method::POST).is_none());
    }

    #[test]
    fn test_duplicate_template_overlapping_methods_fails() {
        let mut table = RouteTable::new();
        table
            .register("/test/<user>", vec![Method::GET, Method::POST], 0usize)
            .unwrap();
        let err = table
            .register("/test/<user>", vec![Method::POST], 1usize)
            .unwrap_err();
        assert!(matches!(err, ProxyError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_duplicate_template_disjoint_methods_ok() {
        let mut table = RouteTable::new();
        table
            .register("/test/<user>", vec![Method::GET], 0usize)
            .unwrap();
        table
            .register("/test/<user>", vec![Method::POST], 1usize)
            .unwrap();
        assert_eq!(*table.resolve("/test/a", &Method::GET).unwrap().handler(), 0);
        assert_eq!(
            *table.resolve("/test/a", &Method::POST).unwrap().handler(),
            1
        );
    }

    #[test]
    fn test_equivalent_expressions_not_duplicates() {
        // "<user>" and "<string:user>" compile to the same expression but
        // the raw template strings differ, so both registrations stand.
        let mut table = RouteTable::new();
        table.register("/t/<user>", vec![Method::GET], 0usize).unwrap();
        table
            .register("/t/<string:user>", vec![Method::GET], 1usize)
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(*table.resolve("/t/a", &Method::GET).unwrap().handler(), 0);
    }

    #[test]
    fn test_register_bad_template_fails() {
        let mut table = RouteTable::new();
        let err = table.register("/test/<int:id", vec![], 0usize).unwrap_err();
        assert!(matches!(err, ProxyError::Compile { .. }));
        assert!(table.is_empty());
    }
}
