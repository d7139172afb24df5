use crate::error::ErrorType;
use crate::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

const INITIALIZE_FAILED: &str = "Error initializing database";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// A failed data endpoint. `Request` errors become a 400 carrying the error message. Anything else
/// is logged and becomes a 500 carrying only the endpoint's static message.
#[derive(Debug)]
pub(crate) struct ApiError {
    error: Error,
    message: &'static str,
}

impl ApiError {
    /// Returns a closure for `map_err` that wraps errors with the endpoint's failure message.
    pub(crate) fn with(message: &'static str) -> impl Fn(Error) -> ApiError {
        move |error| ApiError { error, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.error.error_type() {
            ErrorType::Request => (StatusCode::BAD_REQUEST, self.error.message()),
            _ => {
                error!("{}: {}", self.message, self.error);
                (StatusCode::INTERNAL_SERVER_ERROR, self.message.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// A failed `/initialize`, answered in plain text.
#[derive(Debug)]
pub(crate) struct InitializeError(pub(crate) Error);

impl IntoResponse for InitializeError {
    fn into_response(self) -> Response {
        error!("{INITIALIZE_FAILED}: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, INITIALIZE_FAILED).into_response()
    }
}
