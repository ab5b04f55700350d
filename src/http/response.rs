//! Response construction.
//!
//! Maps dispatch results onto HTTP status codes with a small JSON body. The
//! handlers themselves never write the response; the adapter reports what the
//! router decided.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::dispatch::{DispatchOutcome, ResultCode};
use crate::error::RouterError;

pub fn status_code(code: ResultCode) -> StatusCode {
    match code {
        ResultCode::Success => StatusCode::OK,
        ResultCode::NotFound => StatusCode::NOT_FOUND,
        ResultCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn outcome_response(outcome: &DispatchOutcome) -> Response {
    let code = outcome.code();
    let body = json!({
        "code": code.as_str(),
        "outcome": outcome.label(),
        "route": outcome.pattern(),
    });
    (status_code(code), Json(body)).into_response()
}

/// Response for a dispatch that could not produce an outcome at all.
pub fn error_response(err: &RouterError) -> Response {
    let body = json!({
        "code": ResultCode::InternalServerError.as_str(),
        "outcome": "router_error",
        "error": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
