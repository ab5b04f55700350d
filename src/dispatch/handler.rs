//! Handler contracts and the action bound to a route.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Result returned by controllers, free-function handlers and middleware.
pub type HandlerResult = Result<(), HandlerError>;

/// Failure raised while handling a request.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler could not find the resource it was asked for. Dispatch
    /// treats this exactly like a routing miss.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure.
    #[error(transparent)]
    Fault(Box<dyn StdError + Send + Sync>),

    /// The handler or middleware panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn not_found(message: impl Into<String>) -> Self {
        HandlerError::NotFound(message.into())
    }

    pub fn fault(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        HandlerError::Fault(error.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HandlerError::NotFound(_))
    }
}

/// An object exposing named methods that take the extracted path parameters.
///
/// This is the "controller + method name" half of an action: the router stores
/// the controller and the method name and calls [`Controller::call`] on match.
pub trait Controller: Send + Sync {
    /// Invokes `method` with the positional path parameters.
    fn call(&self, method: &str, params: &[String]) -> HandlerResult;

    /// Invokes `method` with the fault that interrupted dispatch. Used for the
    /// internal-server-error fallback.
    fn call_with_fault(&self, method: &str, fault: &HandlerError) -> HandlerResult {
        self.call(method, &[fault.to_string()])
    }
}

/// A free function handler.
pub type HandlerFn = Arc<dyn Fn(&[String]) -> HandlerResult + Send + Sync>;

/// The callable half of an [`Action`].
#[derive(Clone)]
pub enum Handler {
    BoundMethod {
        controller: Arc<dyn Controller>,
        method: String,
    },
    Function(HandlerFn),
}

impl Handler {
    pub fn bound(controller: Arc<dyn Controller>, method: impl Into<String>) -> Self {
        Handler::BoundMethod {
            controller,
            method: method.into(),
        }
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Function(Arc::new(f))
    }

    pub fn invoke(&self, params: &[String]) -> HandlerResult {
        match self {
            Handler::BoundMethod { controller, method } => controller.call(method, params),
            Handler::Function(f) => f(params),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::BoundMethod { method, .. } => {
                f.debug_struct("BoundMethod").field("method", method).finish()
            }
            Handler::Function(_) => f.write_str("Function"),
        }
    }
}

/// Handler plus the names of the middleware that run before it.
#[derive(Debug, Clone)]
pub struct Action {
    handler: Handler,
    middlewares: Vec<String>,
}

impl Action {
    pub fn new(handler: Handler) -> Self {
        Self {
            handler,
            middlewares: Vec::new(),
        }
    }

    pub fn bound(controller: Arc<dyn Controller>, method: impl Into<String>) -> Self {
        Self::new(Handler::bound(controller, method))
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new(Handler::function(f))
    }

    /// An action that does nothing and succeeds.
    pub fn noop() -> Self {
        Self::function(|_| Ok(()))
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn middlewares(&self) -> &[String] {
        &self.middlewares
    }

    pub fn has_middleware(&self) -> bool {
        !self.middlewares.is_empty()
    }

    pub(crate) fn set_middlewares(&mut self, middlewares: Vec<String>) {
        self.middlewares = middlewares;
    }
}

impl From<Handler> for Action {
    fn from(handler: Handler) -> Self {
        Self::new(handler)
    }
}

impl<C: Controller + 'static> From<(Arc<C>, &str)> for Action {
    fn from((controller, method): (Arc<C>, &str)) -> Self {
        Self::bound(controller, method)
    }
}

impl From<(Arc<dyn Controller>, &str)> for Action {
    fn from((controller, method): (Arc<dyn Controller>, &str)) -> Self {
        Self::bound(controller, method)
    }
}
