//! Dispatch state machine.
//!
//! ```text
//! START → verify fallbacks → MATCHING ─┬─ no match ─────────────→ NOT_FOUND (404)
//!                                      └─ match → MIDDLEWARE → HANDLING ─┬─ ok ──────→ SUCCESS (200)
//!                                                                        ├─ not found → NOT_FOUND (404)
//!                                                                        └─ fault ───→ INTERNAL_ERROR (500)
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::dispatch::handler::{Action, Controller, HandlerError, HandlerResult};
use crate::dispatch::middleware::MiddlewareRegistry;
use crate::dispatch::outcome::DispatchOutcome;
use crate::dispatch::request::{Request, RequestContext};
use crate::error::{FallbackKind, RouterError};
use crate::observability::metrics;
use crate::routing::matcher::Matcher;
use crate::routing::table::RouteTable;

/// A controller + method pair invoked when dispatch cannot complete normally.
#[derive(Clone, Default)]
pub struct FallbackBinding {
    controller: Option<Arc<dyn Controller>>,
    method: String,
}

impl FallbackBinding {
    pub fn new(controller: Arc<dyn Controller>, method: impl Into<String>) -> Self {
        Self {
            controller: Some(controller),
            method: method.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.controller.is_some() && !self.method.is_empty()
    }
}

impl std::fmt::Debug for FallbackBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackBinding")
            .field("controller", &self.controller.is_some())
            .field("method", &self.method)
            .finish()
    }
}

/// The not-found and internal-server-error fallbacks.
#[derive(Debug, Clone, Default)]
pub struct Fallbacks {
    pub not_found: FallbackBinding,
    pub internal_server_error: FallbackBinding,
}

impl Fallbacks {
    /// Checks that both fallbacks are fully bound, field by field in a fixed
    /// order, and reports the first gap.
    pub fn verify(&self) -> Result<(), RouterError> {
        let checks = [
            (
                self.not_found.controller.is_none(),
                RouterError::FallbackNotFoundControllerUndefined,
            ),
            (
                self.not_found.method.is_empty(),
                RouterError::FallbackNotFoundMethodUndefined,
            ),
            (
                self.internal_server_error.controller.is_none(),
                RouterError::FallbackInternalServerErrorControllerUndefined,
            ),
            (
                self.internal_server_error.method.is_empty(),
                RouterError::FallbackInternalServerErrorMethodUndefined,
            ),
        ];
        match checks.into_iter().find(|(missing, _)| *missing) {
            Some((_, err)) => {
                tracing::error!(error = %err, "Dispatch refused");
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn run_not_found(&self) -> Result<(), RouterError> {
        metrics::record_fallback(FallbackKind::NotFound);
        let controller = self
            .not_found
            .controller
            .as_deref()
            .ok_or(RouterError::FallbackNotFoundControllerUndefined)?;
        controller
            .call(&self.not_found.method, &[])
            .map_err(|source| fallback_failed(FallbackKind::NotFound, source))
    }

    fn run_internal_server_error(&self, fault: &HandlerError) -> Result<(), RouterError> {
        metrics::record_fallback(FallbackKind::InternalServerError);
        let controller = self
            .internal_server_error
            .controller
            .as_deref()
            .ok_or(RouterError::FallbackInternalServerErrorControllerUndefined)?;
        controller
            .call_with_fault(&self.internal_server_error.method, fault)
            .map_err(|source| fallback_failed(FallbackKind::InternalServerError, source))
    }
}

fn fallback_failed(kind: FallbackKind, source: HandlerError) -> RouterError {
    let err = RouterError::FallbackFailed { kind, source };
    tracing::error!(error = %err, "Fallback handler failed");
    err
}

/// Runs one request through match, middleware and handler.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    table: &'r RouteTable,
    middlewares: &'r MiddlewareRegistry,
    fallbacks: &'r Fallbacks,
}

impl<'r> Dispatcher<'r> {
    pub fn new(
        table: &'r RouteTable,
        middlewares: &'r MiddlewareRegistry,
        fallbacks: &'r Fallbacks,
    ) -> Self {
        Self {
            table,
            middlewares,
            fallbacks,
        }
    }

    pub fn dispatch(&self, request: &Request) -> Result<DispatchOutcome, RouterError> {
        self.fallbacks.verify()?;

        let mut ctx = RequestContext::new(request);
        let outcome = match Matcher::new(self.table).resolve(&mut ctx) {
            None => {
                tracing::warn!(method = %request.method(), path = %request.path(), "No route matched");
                self.fallbacks.run_not_found()?;
                DispatchOutcome::RouteNotMatched
            }
            Some(action) => self.execute(action, &ctx)?,
        };

        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            code = %outcome.code(),
            outcome = outcome.label(),
            "Request dispatched"
        );
        metrics::record_dispatch(request.method(), outcome.code());
        Ok(outcome)
    }

    fn execute(&self, action: &Action, ctx: &RequestContext) -> Result<DispatchOutcome, RouterError> {
        let pattern = ctx.uri().to_string();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run_action(action, ctx.params())))
            .unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload))));

        match result {
            Ok(()) => Ok(DispatchOutcome::Handled {
                pattern,
                params: ctx.params().to_vec(),
            }),
            Err(HandlerError::NotFound(reason)) => {
                tracing::warn!(pattern = %pattern, reason = %reason, "Handler reported not found");
                self.fallbacks.run_not_found()?;
                Ok(DispatchOutcome::HandlerReportedNotFound { pattern, reason })
            }
            Err(fault) => {
                tracing::error!(pattern = %pattern, error = %fault, "Handler failed");
                self.fallbacks.run_internal_server_error(&fault)?;
                Ok(DispatchOutcome::HandlerFault { pattern, fault })
            }
        }
    }

    fn run_action(&self, action: &Action, params: &[String]) -> HandlerResult {
        for name in action.middlewares() {
            let mut middleware = self.middlewares.instantiate(name).ok_or_else(|| {
                HandlerError::fault(format!("middleware `{name}` is not registered"))
            })?;
            middleware.set_params(params.to_vec());
            middleware.handle()?;
        }
        action.handler().invoke(params)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::Method;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Fallback {
        calls: Mutex<Vec<String>>,
    }

    impl Controller for Fallback {
        fn call(&self, method: &str, params: &[String]) -> HandlerResult {
            self.calls.lock().unwrap().push(format!("{method}:{}", params.join(",")));
            Ok(())
        }
    }

    fn fallbacks(controller: Arc<Fallback>) -> Fallbacks {
        Fallbacks {
            not_found: FallbackBinding::new(controller.clone(), "missing"),
            internal_server_error: FallbackBinding::new(controller, "report"),
        }
    }

    #[test]
    fn test_verify_order() {
        let controller: Arc<dyn Controller> = Arc::new(Fallback::default());
        let mut fallbacks = Fallbacks::default();
        assert!(matches!(
            fallbacks.verify(),
            Err(RouterError::FallbackNotFoundControllerUndefined)
        ));

        fallbacks.not_found = FallbackBinding::new(controller.clone(), "");
        assert!(matches!(
            fallbacks.verify(),
            Err(RouterError::FallbackNotFoundMethodUndefined)
        ));

        fallbacks.not_found = FallbackBinding::new(controller.clone(), "report");
        assert!(matches!(
            fallbacks.verify(),
            Err(RouterError::FallbackInternalServerErrorControllerUndefined)
        ));

        fallbacks.internal_server_error = FallbackBinding::new(controller.clone(), "");
        assert!(matches!(
            fallbacks.verify(),
            Err(RouterError::FallbackInternalServerErrorMethodUndefined)
        ));

        fallbacks.internal_server_error = FallbackBinding::new(controller, "report");
        assert!(fallbacks.verify().is_ok());
    }

    #[test]
    fn test_panic_becomes_fault() {
        let mut table = RouteTable::new();
        table.set_route(Method::Get, "/boom", Action::function(|_| panic!("exploded")));
        let controller = Arc::new(Fallback::default());
        let fallbacks = fallbacks(controller.clone());
        let middlewares = MiddlewareRegistry::new();

        let outcome = Dispatcher::new(&table, &middlewares, &fallbacks)
            .dispatch(&Request::new("GET", "/boom"))
            .unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::HandlerFault { fault: HandlerError::Panicked(ref m), .. } if m == "exploded"
        ));
        assert_eq!(
            controller.calls.lock().unwrap().as_slice(),
            &["report:handler panicked: exploded".to_string()]
        );
    }

    #[test]
    fn test_not_found_fallback_gets_no_params() {
        let table = RouteTable::new();
        let controller = Arc::new(Fallback::default());
        let fallbacks = fallbacks(controller.clone());
        let middlewares = MiddlewareRegistry::new();

        let outcome = Dispatcher::new(&table, &middlewares, &fallbacks)
            .dispatch(&Request::new("GET", "/anything"))
            .unwrap();
        assert!(matches!(outcome, DispatchOutcome::RouteNotMatched));
        assert_eq!(controller.calls.lock().unwrap().as_slice(), &["missing:".to_string()]);
    }
}
