//! Inbound request data and per-dispatch context.

/// Form field that carries an overriding method on POST requests.
pub const DEFAULT_METHOD_OVERRIDE_FIELD: &str = "_method";

/// The method and path of an inbound request, as supplied by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Builds a request where a non-empty override (typically the `_method`
    /// field of a POST form) takes precedence over the transport method.
    pub fn with_override(
        transport_method: impl Into<String>,
        path: impl Into<String>,
        override_method: Option<&str>,
    ) -> Self {
        let method = match override_method {
            Some(method) if !method.is_empty() => method.to_string(),
            _ => transport_method.into(),
        };
        Self::new(method, path)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// State carried through one dispatch.
///
/// Once a route matches, `uri` is replaced by the matched pattern so the action
/// can be bound by exact key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: String,
    uri: String,
    params: Vec<String>,
}

impl RequestContext {
    pub fn new(request: &Request) -> Self {
        Self {
            method: request.method.clone(),
            uri: request.path.clone(),
            params: Vec::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub(crate) fn bind(&mut self, pattern: &str, params: Vec<String>) {
        self.uri = pattern.to_string();
        self.params = params;
    }
}
