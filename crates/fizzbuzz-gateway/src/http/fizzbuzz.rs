//! `GET /fizzbuzz`: validate, generate, and record successful requests.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fizzbuzz_core::error::FizzBuzzError;
use fizzbuzz_core::{generate, validate, RawParams, RequestParams};

use crate::app_state::AppState;
use crate::http::{json_response, ApiError};

#[derive(Debug, Serialize)]
pub struct FizzBuzzResponse {
    pub result: Vec<String>,
}

pub async fn fizzbuzz(
    State(app): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let Query(pairs) = match query {
        Ok(q) => q,
        Err(rej) => return ApiError::BadQuery(rej.body_text()).into_response(),
    };

    let params = match validate(&RawParams::from_pairs(pairs), app.limits()) {
        Ok(p) => p,
        Err(e) => {
            app.metrics()
                .validation_failures
                .inc(&[("code", e.client_code().as_str())]);
            tracing::debug!(reason = %e, "fizzbuzz request rejected");
            return ApiError::from(e).into_response();
        }
    };

    let result = match run_generate(params.clone()).await {
        Ok(r) => r,
        Err(e) => return ApiError::from(e).into_response(),
    };
    app.metrics().generated_items.add(&[], result.len() as u64);

    let resp = json_response(StatusCode::OK, &FizzBuzzResponse { result });
    if resp.status() == StatusCode::OK {
        app.store().record(params);
    }
    resp
}

// Large limits are CPU-bound; keep them off the async workers so the
// request timeout can still fire.
async fn run_generate(p: RequestParams) -> Result<Vec<String>, FizzBuzzError> {
    tokio::task::spawn_blocking(move || generate(p.divisor_a, p.divisor_b, p.limit, &p.label_a, &p.label_b))
        .await
        .map_err(|e| FizzBuzzError::Internal(format!("generator task failed: {e}")))
}
