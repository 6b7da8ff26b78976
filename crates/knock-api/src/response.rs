use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use knock_model::TaskResult;

use crate::error::ApiError;

/// What a route handler produces: a task result, nothing to report, or a request error.
pub(crate) type Outcome = Result<Option<TaskResult>, ApiError>;

/// Map a handler outcome to the wire response.
///
/// - `Err` -> 418 with `Request error: <message>`
/// - `Ok(Some)` -> pretty JSON, 200 on `Retcode == 0`, 500 otherwise
/// - `Ok(None)` -> empty 200
pub(crate) fn respond(outcome: Outcome) -> Response {
    let result = match outcome {
        Err(err) => return err.into_response(),
        Ok(None) => return StatusCode::OK.into_response(),
        Ok(Some(result)) => result,
    };

    let body = match serde_json::to_string_pretty(&result) {
        Ok(body) => body,
        Err(e) => return ApiError::Internal(format!("encode result: {e}")).into_response(),
    };

    if result.is_success() {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "application/json")],
            format!("{body}\n"),
        )
            .into_response()
    }
}
