//! Axum router wiring.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, http, middleware as mw, ops};

pub fn build_router(state: AppState) -> Router {
    let not_allowed = http::response::method_not_allowed;

    Router::new()
        // HEAD falls through to the GET handler unless routed; it must not be recorded.
        .route(
            "/fizzbuzz",
            get(http::fizzbuzz::fizzbuzz).head(not_allowed).fallback(not_allowed),
        )
        .route("/statistics", get(http::statistics::statistics).fallback(not_allowed))
        .route("/health", get(ops::health))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(state.clone(), mw::timeout))
        .layer(middleware::from_fn_with_state(state.clone(), mw::cors))
        .layer(middleware::from_fn_with_state(state.clone(), mw::catch_panic))
        .layer(middleware::from_fn_with_state(state.clone(), mw::request_log))
        .layer(middleware::from_fn(mw::request_id))
        .with_state(state)
}
