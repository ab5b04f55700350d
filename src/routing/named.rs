//! Named routes and reverse URL generation.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::RouterError;
use crate::routing::pattern::{placeholder_count, placeholder_name};

/// Maps route names to their (group-prefixed) patterns.
#[derive(Debug, Default, Clone)]
pub struct NamedRouteRegistry {
    routes: BTreeMap<String, String>,
}

impl NamedRouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` for `pattern`.
    ///
    /// Names are unique: a second registration fails and leaves the existing
    /// entry untouched.
    pub fn set_route(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<(), RouterError> {
        let name = name.into();
        if self.routes.contains_key(&name) {
            let err = RouterError::DuplicateNamedRoute(name);
            tracing::error!(error = %err, "Named route registration rejected");
            return Err(err);
        }
        let pattern = pattern.into();
        tracing::debug!(name = %name, pattern = %pattern, "Named route registered");
        self.routes.insert(name, pattern);
        Ok(())
    }

    /// Returns the pattern registered under `name`, or an empty string.
    pub fn get_route(&self, name: &str) -> &str {
        self.routes.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// All named routes, ordered by name.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(n, p)| (n.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Builds a URL for the named route.
    ///
    /// Placeholders are replaced by `params` positionally, left to right. The
    /// number of params must equal the number of placeholders exactly.
    pub fn url_for(&self, name: &str, params: &[&dyn Display]) -> Result<String, RouterError> {
        let Some(pattern) = self.routes.get(name) else {
            let err = RouterError::UndefinedNamedRoute(name.to_string());
            tracing::error!(error = %err, "URL generation failed");
            return Err(err);
        };

        let expected = placeholder_count(pattern);
        if params.len() != expected {
            let err = RouterError::InsufficientArgumentsForTheRoute {
                provided: params.len(),
                expected,
            };
            tracing::error!(route = %name, error = %err, "URL generation failed");
            return Err(err);
        }

        let mut values = params.iter();
        let mut segments = Vec::new();
        for segment in pattern.split('/') {
            match placeholder_name(segment).and_then(|_| values.next()) {
                Some(value) => segments.push(value.to_string()),
                None => segments.push(segment.to_string()),
            }
        }
        Ok(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_placeholders() {
        let mut registry = NamedRouteRegistry::new();
        registry.set_route("home.index", "/home").unwrap();
        assert_eq!(registry.url_for("home.index", &[]).unwrap(), "/home");
    }

    #[test]
    fn test_url_substitutes_in_order() {
        let mut registry = NamedRouteRegistry::new();
        registry
            .set_route("post.comment", "/posts/{post}/comments/{comment}")
            .unwrap();
        let url = registry.url_for("post.comment", &[&7, &"abc"]).unwrap();
        assert_eq!(url, "/posts/7/comments/abc");
    }

    #[test]
    fn test_duplicate_name_keeps_first_pattern() {
        let mut registry = NamedRouteRegistry::new();
        registry.set_route("index", "/home").unwrap();
        let err = registry.set_route("index", "/contact").unwrap_err();
        assert!(matches!(err, RouterError::DuplicateNamedRoute(ref n) if n == "index"));
        assert_eq!(registry.get_route("index"), "/home");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_route_absent_is_empty() {
        let registry = NamedRouteRegistry::new();
        assert_eq!(registry.get_route("missing"), "");
    }

    #[test]
    fn test_undefined_name() {
        let registry = NamedRouteRegistry::new();
        let err = registry.url_for("indes", &[]).unwrap_err();
        assert!(matches!(err, RouterError::UndefinedNamedRoute(_)));
    }

    #[test]
    fn test_argument_count_must_match() {
        let mut registry = NamedRouteRegistry::new();
        registry.set_route("contact.theme", "contact/{theme}").unwrap();

        let too_few = registry.url_for("contact.theme", &[]).unwrap_err();
        assert!(matches!(
            too_few,
            RouterError::InsufficientArgumentsForTheRoute { provided: 0, expected: 1 }
        ));

        let too_many = registry.url_for("contact.theme", &[&2, &5]).unwrap_err();
        assert!(matches!(
            too_many,
            RouterError::InsufficientArgumentsForTheRoute { provided: 2, expected: 1 }
        ));

        assert_eq!(registry.url_for("contact.theme", &[&1]).unwrap(), "contact/1");
    }
}
