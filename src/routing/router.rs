//! Route registration and dispatch entry point.
//!
//! # Responsibilities
//! - Register routes per method, with group and single-route scoping
//! - Name routes through the handle returned at registration
//! - Hold middleware implementations and fallback bindings
//! - Dispatch requests and generate URLs for named routes
//!
//! # Design Decisions
//! - Built once, then shared read-only (`Arc<Router>`); dispatch takes `&self`
//! - No process-wide table: every router owns its routes and names
//! - Middleware names are checked when declared, not when dispatched

use std::fmt::Display;
use std::sync::Arc;

use crate::dispatch::{
    Action, Controller, DispatchOutcome, Dispatcher, FallbackBinding, Fallbacks, Middleware,
    MiddlewareRegistry, Request,
};
use crate::error::RouterError;
use crate::routing::named::NamedRouteRegistry;
use crate::routing::table::{GroupOptions, Method, RouteTable};

/// Routes, named routes, middleware and fallbacks of one application.
#[derive(Debug, Default)]
pub struct Router {
    table: RouteTable,
    named: NamedRouteRegistry,
    middlewares: MiddlewareRegistry,
    fallbacks: Fallbacks,
}

/// Returned by route registration; names the route just registered.
#[derive(Debug)]
pub struct RouteHandle<'r> {
    named: &'r mut NamedRouteRegistry,
    pattern: String,
    name_prefix: String,
}

impl RouteHandle<'_> {
    /// The pattern as stored, group prefix included.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Registers this route under `name`, prefixed by the active group name.
    pub fn name(self, name: &str) -> Result<(), RouterError> {
        let full_name = format!("{}{}", self.name_prefix, name);
        self.named.set_route(full_name, self.pattern)
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, pattern: &str, action: impl Into<Action>) -> RouteHandle<'_> {
        self.route(Method::Get, pattern, action)
    }

    pub fn post(&mut self, pattern: &str, action: impl Into<Action>) -> RouteHandle<'_> {
        self.route(Method::Post, pattern, action)
    }

    pub fn put(&mut self, pattern: &str, action: impl Into<Action>) -> RouteHandle<'_> {
        self.route(Method::Put, pattern, action)
    }

    pub fn delete(&mut self, pattern: &str, action: impl Into<Action>) -> RouteHandle<'_> {
        self.route(Method::Delete, pattern, action)
    }

    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        action: impl Into<Action>,
    ) -> RouteHandle<'_> {
        let pattern = self.table.set_route(method, pattern, action.into());
        RouteHandle {
            name_prefix: self.table.group_name().to_string(),
            named: &mut self.named,
            pattern,
        }
    }

    /// Attaches middleware to the next registered route only.
    pub fn middleware<I>(&mut self, names: I) -> Result<&mut Self, RouterError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.middlewares.verify(&names)?;
        self.table.set_single_middleware(names);
        Ok(self)
    }

    /// Registers the routes declared by `routes` under a common scope.
    ///
    /// The scope is closed when `routes` returns, whether or not it failed.
    pub fn group<F>(&mut self, options: GroupOptions, routes: F) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Self) -> Result<(), RouterError>,
    {
        if let Some(names) = &options.middleware {
            self.middlewares.verify(names)?;
        }
        self.table.push_group(&options);
        let result = routes(self);
        self.table.pop_group();
        result
    }

    /// Makes a middleware implementation available under `name`.
    pub fn register_middleware<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Middleware> + Send + Sync + 'static,
    {
        self.middlewares.register(name, factory);
        self
    }

    /// Makes a [`Default`]-constructible middleware available under `name`.
    pub fn register_middleware_default<M>(&mut self, name: impl Into<String>) -> &mut Self
    where
        M: Middleware + Default + 'static,
    {
        self.middlewares.register_default::<M>(name);
        self
    }

    /// Controller method invoked when no route matches or a handler reports
    /// not found.
    pub fn fallback_not_found(&mut self, controller: Arc<dyn Controller>, method: &str) {
        self.fallbacks.not_found = FallbackBinding::new(controller, method);
    }

    /// Controller method invoked with the fault when a handler fails.
    pub fn fallback_internal_server_error(&mut self, controller: Arc<dyn Controller>, method: &str) {
        self.fallbacks.internal_server_error = FallbackBinding::new(controller, method);
    }

    /// Dispatches one request. See [`Dispatcher`].
    pub fn dispatch(&self, request: &Request) -> Result<DispatchOutcome, RouterError> {
        Dispatcher::new(&self.table, &self.middlewares, &self.fallbacks).dispatch(request)
    }

    /// URL for a named route with its placeholders filled in order.
    pub fn url_for(&self, name: &str, params: &[&dyn Display]) -> Result<String, RouterError> {
        self.named.url_for(name, params)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn named_routes(&self) -> &NamedRouteRegistry {
        &self.named
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{HandlerError, HandlerResult};

    #[derive(Default)]
    struct Noop;

    impl Middleware for Noop {
        fn set_params(&mut self, _params: Vec<String>) {}

        fn handle(&mut self) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn test_name_uses_registered_pattern() {
        let mut router = Router::new();
        router.get("/home", Action::noop()).name("home.index").unwrap();
        router.put("/blog/1", Action::noop()).name("blog.update").unwrap();

        assert_eq!(router.url_for("home.index", &[]).unwrap(), "/home");
        assert_eq!(router.url_for("blog.update", &[]).unwrap(), "/blog/1");
    }

    #[test]
    fn test_group_name_and_prefix() {
        let mut router = Router::new();
        router
            .group(GroupOptions::new().name("group.").prefix("prefix"), |r| {
                r.get("/example/group", Action::noop()).name("example")
            })
            .unwrap();
        router.post("/contact", Action::noop()).name("contact.store").unwrap();

        assert_eq!(router.url_for("group.example", &[]).unwrap(), "prefix/example/group");
        assert_eq!(router.url_for("contact.store", &[]).unwrap(), "/contact");
    }

    #[test]
    fn test_group_scope_closed_after_error() {
        let mut router = Router::new();
        let result = router.group(GroupOptions::new().prefix("/admin"), |r| {
            r.get("/a", Action::noop()).name("dup")?;
            r.get("/b", Action::noop()).name("dup")
        });
        assert!(matches!(result, Err(RouterError::DuplicateNamedRoute(_))));

        let handle = router.get("/c", Action::noop());
        assert_eq!(handle.pattern(), "/c");
    }

    #[test]
    fn test_unregistered_middleware_rejected_at_declaration() {
        let mut router = Router::new();
        router.register_middleware_default::<Noop>("noop");
        assert!(router.middleware(["noop"]).is_ok());

        let err = router.middleware(["incorrect"]).unwrap_err();
        assert!(matches!(err, RouterError::InvalidMiddleware(_)));

        let err = router
            .group(GroupOptions::new().middleware(["incorrect"]), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidMiddleware(_)));
    }

    #[test]
    fn test_dispatch_requires_fallbacks() {
        let mut router = Router::new();
        router.get("/home", Action::function(|_| Err(HandlerError::fault("unreachable"))));
        let err = router.dispatch(&Request::new("GET", "/home")).unwrap_err();
        assert!(matches!(err, RouterError::FallbackNotFoundControllerUndefined));
    }
}
