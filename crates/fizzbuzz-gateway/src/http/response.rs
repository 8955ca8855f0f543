//! JSON responses and the HTTP mapping of `FizzBuzzError`.
//!
//! Every body leaving the gateway is `application/json`, errors included.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fizzbuzz_core::{ClientCode, FizzBuzzError};

const INTERNAL_BODY: &[u8] = br#"{"error":"internal server error"}"#;

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Serialize `body` with `status`. Encoding failures are logged and become a
/// generic 500.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_json_type(status, bytes),
        Err(e) => {
            tracing::error!(error = %e, "response encoding failed");
            internal_error()
        }
    }
}

pub fn internal_error() -> Response {
    with_json_type(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY.to_vec())
}

fn with_json_type(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut resp = (status, bytes).into_response();
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

/// Handler-level error.
#[derive(Debug)]
pub enum ApiError {
    Core(FizzBuzzError),
    /// The query string itself could not be decoded.
    BadQuery(String),
    MethodNotAllowed,
}

impl From<FizzBuzzError> for ApiError {
    fn from(e: FizzBuzzError) -> Self {
        ApiError::Core(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Core(e) => match e.client_code() {
                ClientCode::BadRequest => StatusCode::BAD_REQUEST,
                ClientCode::NotFound => StatusCode::NOT_FOUND,
                ClientCode::Timeout => StatusCode::SERVICE_UNAVAILABLE,
                ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// JSON 405 for verbs a route does not serve.
pub async fn method_not_allowed() -> Response {
    ApiError::MethodNotAllowed.into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadQuery(msg) => json_response(status, &ErrorBody { error: msg }),
            ApiError::MethodNotAllowed => json_response(status, &ErrorBody { error: "method not allowed" }),
            ApiError::Core(e) if e.is_client_visible() => {
                json_response(status, &ErrorBody { error: &e.to_string() })
            }
            ApiError::Core(e) => {
                tracing::error!(error = %e, "internal error");
                internal_error()
            }
        }
    }
}
