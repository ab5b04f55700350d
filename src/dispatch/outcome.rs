//! Dispatch results.

use std::fmt;

use crate::dispatch::handler::HandlerError;

/// The externally visible result code of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    NotFound,
    InternalServerError,
}

impl ResultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Success => "200",
            ResultCode::NotFound => "404",
            ResultCode::InternalServerError => "500",
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ResultCode::Success => 200,
            ResultCode::NotFound => 404,
            ResultCode::InternalServerError => 500,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one dispatch.
///
/// Three distinct failure causes collapse onto two result codes; they stay
/// separate here so callers and tests can tell them apart.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler completed normally.
    Handled { pattern: String, params: Vec<String> },
    /// No registered pattern is compatible with the request.
    RouteNotMatched,
    /// A middleware or the handler signalled that the resource does not exist.
    HandlerReportedNotFound { pattern: String, reason: String },
    /// A middleware or the handler failed. The fault was forwarded to the
    /// internal-server-error fallback.
    HandlerFault { pattern: String, fault: HandlerError },
}

impl DispatchOutcome {
    pub fn code(&self) -> ResultCode {
        match self {
            DispatchOutcome::Handled { .. } => ResultCode::Success,
            DispatchOutcome::RouteNotMatched
            | DispatchOutcome::HandlerReportedNotFound { .. } => ResultCode::NotFound,
            DispatchOutcome::HandlerFault { .. } => ResultCode::InternalServerError,
        }
    }

    /// The matched pattern, if routing succeeded.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Handled { pattern, .. }
            | DispatchOutcome::HandlerReportedNotFound { pattern, .. }
            | DispatchOutcome::HandlerFault { pattern, .. } => Some(pattern),
            DispatchOutcome::RouteNotMatched => None,
        }
    }

    /// Short label used in logs, metrics and response bodies.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Handled { .. } => "handled",
            DispatchOutcome::RouteNotMatched => "route_not_matched",
            DispatchOutcome::HandlerReportedNotFound { .. } => "handler_reported_not_found",
            DispatchOutcome::HandlerFault { .. } => "handler_fault",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(DispatchOutcome::RouteNotMatched.code().as_str(), "404");
        let reported = DispatchOutcome::HandlerReportedNotFound {
            pattern: "/home".into(),
            reason: "gone".into(),
        };
        assert_eq!(reported.code(), ResultCode::NotFound);
        let fault = DispatchOutcome::HandlerFault {
            pattern: "/home".into(),
            fault: HandlerError::fault("boom"),
        };
        assert_eq!(fault.code().to_string(), "500");
        assert_eq!(fault.pattern(), Some("/home"));
    }
}
