//! fizzbuzz gateway
//!
//! - `GET /fizzbuzz?divisorA=&divisorB=&limit=&labelA=&labelB=`
//! - `GET /statistics` : most frequent successful request
//! - `GET /health`, `/readyz`, `/metrics`

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::sync::watch;

use fizzbuzz_core::Result;
use fizzbuzz_core::error::FizzBuzzError;
use fizzbuzz_gateway::{app_state, config, logging, router, shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&cfg.log);

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: config::GatewayConfig) -> Result<()> {
    let listen = cfg.server.listen_addr()?;
    let grace = cfg.server.shutdown_timeout();

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| FizzBuzzError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "fizzbuzz-gateway starting");

    let (drain_tx, drain_rx) = watch::channel(false);
    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown::wait_for_signal(state, drain_tx))
        .into_future();

    tokio::select! {
        res = server => {
            res.map_err(|e| FizzBuzzError::Internal(format!("server error: {e}")))?;
            tracing::info!("server stopped");
        }
        _ = shutdown::drain_deadline(drain_rx, grace) => {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "shutdown timeout elapsed, dropping open connections");
        }
    }
    Ok(())
}
