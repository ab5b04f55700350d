//! Middleware contract and registry.
//!
//! Routes refer to middleware by name. Names are resolved against the
//! registry when a route or group is declared, so a route table can never hold
//! a reference that fails to instantiate at dispatch time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::handler::HandlerResult;
use crate::error::RouterError;

/// Logic that runs before a route handler.
///
/// A fresh instance is created for every dispatch. The dispatcher hands it the
/// extracted path parameters before calling [`Middleware::handle`].
pub trait Middleware: Send {
    fn set_params(&mut self, params: Vec<String>);

    fn handle(&mut self) -> HandlerResult;
}

/// Builds a new middleware instance.
pub type MiddlewareFactory = Arc<dyn Fn() -> Box<dyn Middleware> + Send + Sync>;

#[derive(Default, Clone)]
pub struct MiddlewareRegistry {
    factories: HashMap<String, MiddlewareFactory>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Middleware> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(middleware = %name, "Middleware registered");
        self.factories.insert(name, Arc::new(factory));
    }

    /// Registers a middleware type built through [`Default`].
    pub fn register_default<M>(&mut self, name: impl Into<String>)
    where
        M: Middleware + Default + 'static,
    {
        self.register(name, || Box::new(M::default()) as Box<dyn Middleware>);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Checks that every name resolves to a registered middleware.
    pub fn verify<'a, I>(&self, names: I) -> Result<(), RouterError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        for name in names {
            if !self.contains(name) {
                let err = RouterError::InvalidMiddleware(name.clone());
                tracing::error!(error = %err, "Middleware rejected");
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Middleware>> {
        self.factories.get(name).map(|factory| factory())
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry")
            .field("middlewares", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Passthrough {
        params: Vec<String>,
    }

    impl Middleware for Passthrough {
        fn set_params(&mut self, params: Vec<String>) {
            self.params = params;
        }

        fn handle(&mut self) -> HandlerResult {
            Ok(())
        }
    }

    #[test]
    fn test_verify_rejects_unknown_names() {
        let mut registry = MiddlewareRegistry::new();
        registry.register_default::<Passthrough>("passthrough");

        let known = vec!["passthrough".to_string()];
        assert!(registry.verify(&known).is_ok());

        let unknown = vec!["passthrough".to_string(), "incorrect".to_string()];
        let err = registry.verify(&unknown).unwrap_err();
        assert!(matches!(err, RouterError::InvalidMiddleware(ref n) if n == "incorrect"));
    }

    #[test]
    fn test_instantiate_creates_fresh_instances() {
        let mut registry = MiddlewareRegistry::new();
        registry.register_default::<Passthrough>("passthrough");

        let mut first = registry.instantiate("passthrough").unwrap();
        first.set_params(vec!["1".into()]);
        assert!(first.handle().is_ok());
        assert!(registry.instantiate("passthrough").is_some());
        assert!(registry.instantiate("missing").is_none());
    }
}
