//! Shared controllers, middleware and router setup for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use request_router::{Controller, HandlerError, HandlerResult, Middleware, Router};

/// Records every `method(params)` call it receives.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &str, params: &[String]) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{method}({})", params.join(",")));
    }
}

/// Site controller: most actions succeed, two of them fail on purpose.
#[derive(Default)]
pub struct GeneralController {
    pub recorder: Recorder,
}

impl Controller for GeneralController {
    fn call(&self, method: &str, params: &[String]) -> HandlerResult {
        self.recorder.record(method, params);
        match method {
            "forcing_not_found" => Err(HandlerError::not_found("record does not exist")),
            "internal_server_error" => Err(HandlerError::fault("database is down")),
            _ => Ok(()),
        }
    }
}

/// Fallback controller that records calls, including the fault it is given.
#[derive(Default)]
pub struct FallbackController {
    pub recorder: Recorder,
}

impl Controller for FallbackController {
    fn call(&self, method: &str, params: &[String]) -> HandlerResult {
        self.recorder.record(method, params);
        Ok(())
    }
}

/// Middleware that appends the route params it saw to a shared log.
pub struct ExampleMiddleware {
    log: Arc<Mutex<Vec<String>>>,
    params: Vec<String>,
}

impl Middleware for ExampleMiddleware {
    fn set_params(&mut self, params: Vec<String>) {
        self.params = params;
    }

    fn handle(&mut self) -> HandlerResult {
        self.log.lock().unwrap().push(self.params.join(","));
        Ok(())
    }
}

/// Middleware that rejects every request as not found.
#[derive(Default)]
pub struct DenyMiddleware;

impl Middleware for DenyMiddleware {
    fn set_params(&mut self, _params: Vec<String>) {}

    fn handle(&mut self) -> HandlerResult {
        Err(HandlerError::not_found("denied by middleware"))
    }
}

/// Registers `example` (logging into the returned vector) and `deny`.
pub fn register_middlewares(router: &mut Router) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let shared = log.clone();
    router.register_middleware("example", move || {
        Box::new(ExampleMiddleware {
            log: shared.clone(),
            params: Vec::new(),
        }) as Box<dyn Middleware>
    });
    router.register_middleware_default::<DenyMiddleware>("deny");
    log
}

/// Binds both fallbacks to one recording controller.
pub fn define_fallbacks(router: &mut Router) -> Arc<FallbackController> {
    let fallback = Arc::new(FallbackController::default());
    router.fallback_not_found(fallback.clone(), "not_found");
    router.fallback_internal_server_error(fallback.clone(), "internal_server_error");
    fallback
}
