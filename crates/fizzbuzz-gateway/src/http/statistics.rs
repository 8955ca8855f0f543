//! `GET /statistics`: the most requested parameter tuple.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fizzbuzz_core::error::FizzBuzzError;
use fizzbuzz_core::RequestParams;

use crate::app_state::AppState;
use crate::http::{json_response, ApiError};

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub params: RequestParams,
    pub hits: u64,
}

pub async fn statistics(State(app): State<AppState>) -> Response {
    match app.store().most_frequent() {
        Some(top) => json_response(
            StatusCode::OK,
            &StatisticsResponse {
                params: top.params,
                hits: top.hits,
            },
        ),
        None => ApiError::from(FizzBuzzError::NoStatistics).into_response(),
    }
}
