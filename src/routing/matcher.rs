//! Route matching logic.
//!
//! # Responsibilities
//! - Split request path and patterns into `/`-delimited segments
//! - Compare literal segments byte for byte
//! - Capture placeholder segments as positional parameters
//!
//! # Design Decisions
//! - Method matching is exact and case-sensitive
//! - Patterns with a different segment count are skipped before any comparison
//! - First compatible pattern in registration order wins; no specificity scoring
//! - Parameters come from the winning candidate only
//! - No regex to guarantee O(n) matching

use crate::dispatch::{Action, RequestContext};
use crate::routing::pattern::{self, Segment};
use crate::routing::table::RouteTable;

/// A successful match: the pattern as registered and the captured values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'t> {
    pub pattern: &'t str,
    pub params: Vec<String>,
}

/// Resolves requests against a [`RouteTable`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'t> {
    table: &'t RouteTable,
}

impl<'t> Matcher<'t> {
    pub fn new(table: &'t RouteTable) -> Self {
        Self { table }
    }

    /// Finds the first registered pattern for `method` compatible with `path`.
    pub fn find(&self, method: &str, path: &str) -> Option<RouteMatch<'t>> {
        let routes = self.table.routes_by_method(method)?;
        let request_segments: Vec<&str> = pattern::split_trimmed(path).collect();

        routes.patterns().find_map(|candidate| {
            let segments = pattern::parse(candidate);
            if segments.len() != request_segments.len() {
                return None;
            }
            capture(&segments, &request_segments).map(|params| RouteMatch {
                pattern: candidate,
                params,
            })
        })
    }

    /// Matches the context's request, rewrites its URI to the winning pattern
    /// and binds the action by exact key.
    ///
    /// Returns `None` when the request is not a valid route.
    pub fn resolve(&self, ctx: &mut RequestContext) -> Option<&'t Action> {
        if let Some(found) = self.find(ctx.method(), ctx.uri()) {
            ctx.bind(found.pattern, found.params);
        }
        self.table.get(ctx.method(), ctx.uri())
    }
}

/// Walks pattern and request segments pairwise. Returns the captured values
/// only if every segment is accepted.
fn capture(pattern: &[Segment<'_>], request: &[&str]) -> Option<Vec<String>> {
    let mut params = Vec::new();
    for (segment, value) in pattern.iter().zip(request) {
        if !segment.accepts(value) {
            return None;
        }
        if let Segment::Param(_) = segment {
            params.push((*value).to_string());
        }
    }
    Some(params)
}
