//! Router error definitions.

use thiserror::Error;

use crate::dispatch::HandlerError;

/// Errors raised by route registration, URL generation and dispatch setup.
///
/// Dispatch-time faults raised by handlers never surface here: the dispatcher
/// converts them into a fallback outcome. The exception is a fallback handler
/// that fails itself, reported as [`RouterError::FallbackFailed`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route name was registered twice.
    #[error("a route named `{0}` is already registered")]
    DuplicateNamedRoute(String),

    /// URL generation was requested for an unknown route name.
    #[error("no route named `{0}` is registered")]
    UndefinedNamedRoute(String),

    /// URL generation received the wrong number of positional parameters.
    #[error("{provided} arguments were provided, but the route expects {expected}")]
    InsufficientArgumentsForTheRoute { provided: usize, expected: usize },

    /// A middleware reference does not resolve to a registered implementation.
    #[error("middleware `{0}` is not registered as a Middleware implementation")]
    InvalidMiddleware(String),

    #[error("fallback not-found controller is undefined")]
    FallbackNotFoundControllerUndefined,

    #[error("fallback not-found method is undefined")]
    FallbackNotFoundMethodUndefined,

    #[error("fallback internal-server-error controller is undefined")]
    FallbackInternalServerErrorControllerUndefined,

    #[error("fallback internal-server-error method is undefined")]
    FallbackInternalServerErrorMethodUndefined,

    /// The not-found or internal-error fallback failed while handling a request.
    #[error("{kind} fallback failed: {source}")]
    FallbackFailed {
        kind: FallbackKind,
        #[source]
        source: HandlerError,
    },
}

impl RouterError {
    /// Returns true for errors caused by an incomplete router setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouterError::InvalidMiddleware(_)
                | RouterError::FallbackNotFoundControllerUndefined
                | RouterError::FallbackNotFoundMethodUndefined
                | RouterError::FallbackInternalServerErrorControllerUndefined
                | RouterError::FallbackInternalServerErrorMethodUndefined
        )
    }
}

/// Which fallback was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    NotFound,
    InternalServerError,
}

impl FallbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackKind::NotFound => "not_found",
            FallbackKind::InternalServerError => "internal_server_error",
        }
    }
}

impl std::fmt::Display for FallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_arguments_message() {
        let err = RouterError::InsufficientArgumentsForTheRoute {
            provided: 2,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "2 arguments were provided, but the route expects 1"
        );
    }

    #[test]
    fn test_configuration_errors() {
        assert!(RouterError::FallbackNotFoundMethodUndefined.is_configuration());
        assert!(RouterError::InvalidMiddleware("auth".into()).is_configuration());
        assert!(!RouterError::UndefinedNamedRoute("home".into()).is_configuration());
    }
}
