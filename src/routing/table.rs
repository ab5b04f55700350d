//! Route storage per HTTP method, with group scoping.
//!
//! # Design Decisions
//! - Insertion order is kept per method; re-registering a pattern replaces the
//!   action in place without moving it
//! - Group scopes form a stack; nested groups concatenate name and path
//!   prefixes and append their middleware after the outer group's
//! - Pending single-route middleware is consumed by the next registration and
//!   overrides group middleware for that route

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::Action;

/// Supported request methods. Parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unsupported request method `{0}`")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(UnsupportedMethod(other.to_string())),
        }
    }
}

/// Options applied to every route declared inside a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GroupOptions {
    /// Prepended to the name of every named route.
    pub name: Option<String>,
    /// Prepended to every pattern.
    pub prefix: Option<String>,
    /// Middleware attached to every route.
    pub middleware: Option<Vec<String>>,
}

impl GroupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn middleware<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.middleware = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Effective scope after composing all active groups.
#[derive(Debug, Clone, Default)]
struct GroupScope {
    name: String,
    prefix: String,
    middleware: Vec<String>,
}

/// Ordered pattern → action table for one method.
#[derive(Debug, Clone, Default)]
pub struct MethodRoutes {
    entries: Vec<(String, Action)>,
    index: HashMap<String, usize>,
}

impl MethodRoutes {
    fn insert(&mut self, pattern: String, action: Action) {
        match self.index.get(&pattern) {
            Some(&slot) => self.entries[slot].1 = action,
            None => {
                self.index.insert(pattern.clone(), self.entries.len());
                self.entries.push((pattern, action));
            }
        }
    }

    pub fn get(&self, pattern: &str) -> Option<&Action> {
        self.index.get(pattern).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.index.contains_key(pattern)
    }

    /// Patterns and actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.entries.iter().map(|(p, a)| (p.as_str(), a))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Every registered route, keyed by method.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<Method, MethodRoutes>,
    groups: Vec<GroupScope>,
    pending_middleware: Option<Vec<String>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `action` for `method` and returns the stored pattern, with the
    /// active group prefix applied.
    pub fn set_route(&mut self, method: Method, pattern: &str, mut action: Action) -> String {
        let scope = self.current_scope();
        let pattern = format!("{}{}", scope.prefix, pattern);

        if let Some(single) = self.pending_middleware.take() {
            action.set_middlewares(single);
        } else if !scope.middleware.is_empty() {
            action.set_middlewares(scope.middleware.clone());
        }

        tracing::debug!(
            method = %method,
            pattern = %pattern,
            middlewares = ?action.middlewares(),
            "Route registered"
        );
        self.routes
            .entry(method)
            .or_default()
            .insert(pattern.clone(), action);
        pattern
    }

    /// Queues middleware for the next registered route only. Repeated calls
    /// before that registration accumulate.
    pub fn set_single_middleware(&mut self, names: Vec<String>) {
        self.pending_middleware
            .get_or_insert_with(Vec::new)
            .extend(names);
    }

    /// Opens a group scope nested inside the current one.
    pub fn push_group(&mut self, options: &GroupOptions) {
        let outer = self.current_scope();
        let mut middleware = outer.middleware;
        if let Some(inner) = &options.middleware {
            middleware.extend(inner.iter().cloned());
        }
        self.groups.push(GroupScope {
            name: format!("{}{}", outer.name, options.name.as_deref().unwrap_or("")),
            prefix: format!("{}{}", outer.prefix, options.prefix.as_deref().unwrap_or("")),
            middleware,
        });
    }

    /// Closes the innermost group scope.
    pub fn pop_group(&mut self) {
        self.groups.pop();
    }

    /// Name prefix of the innermost active group, or an empty string.
    pub fn group_name(&self) -> &str {
        self.groups.last().map(|g| g.name.as_str()).unwrap_or("")
    }

    /// Path prefix of the innermost active group, or an empty string.
    pub fn group_prefix(&self) -> &str {
        self.groups.last().map(|g| g.prefix.as_str()).unwrap_or("")
    }

    fn current_scope(&self) -> GroupScope {
        self.groups.last().cloned().unwrap_or_default()
    }

    /// Routes registered for `method`. Unknown methods have none.
    pub fn routes_by_method(&self, method: &str) -> Option<&MethodRoutes> {
        let method = method.parse::<Method>().ok()?;
        self.routes.get(&method)
    }

    pub fn get(&self, method: &str, pattern: &str) -> Option<&Action> {
        self.routes_by_method(method)?.get(pattern)
    }

    pub fn contains(&self, method: &str, pattern: &str) -> bool {
        self.get(method, pattern).is_some()
    }

    /// Methods that have at least one route, in a fixed order.
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL
            .into_iter()
            .filter(|m| self.routes.get(m).is_some_and(|r| !r.is_empty()))
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(MethodRoutes::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
