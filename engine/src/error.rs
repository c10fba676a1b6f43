use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use serde_json::json;
use std::error::Error;
use tracing::error;

/// Decides how an error context is surfaced to an HTTP caller.
///
/// Anything that is not a client error is treated as an internal fault: the full
/// report is logged and the caller only sees the status code.
pub trait ErrorStatus: Error + Send + Sync + 'static {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(thiserror::Error)]
#[error("there was an error running the endpoint")]
pub struct EndpointError<T: Error + Send + Sync + 'static>(Report<T>);

impl<T: Error + Send + Sync + 'static> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error + Send + Sync + 'static,
{
    fn from(value: Report<T>) -> Self {
        Self(value)
    }
}

impl<T: ErrorStatus> IntoResponse for EndpointError<T> {
    fn into_response(self) -> Response {
        let context = self.0.current_context();
        let status_code = context.status_code();

        if status_code.is_client_error() {
            (status_code, Json(json!({ "message": context.to_string() }))).into_response()
        } else {
            error!("endpoint failed: {:?}", self.0);
            status_code.into_response()
        }
    }
}
