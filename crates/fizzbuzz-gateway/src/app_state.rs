//! Shared application state for the fizzbuzz gateway.
//!
//! The statistics store is owned here and handed to handlers by `Arc`;
//! tests build isolated instances with [`AppState::with_store`].

use std::sync::Arc;

use fizzbuzz_core::{FrequencyStore, ValidationLimits};

use crate::config::GatewayConfig;
use crate::obs::ServiceMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<FrequencyStore>,
    metrics: Arc<ServiceMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    limits: ValidationLimits,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self::with_store(cfg, Arc::new(FrequencyStore::new()))
    }

    pub fn with_store(cfg: GatewayConfig, store: Arc<FrequencyStore>) -> Self {
        let limits = cfg.limits.validation_limits();
        Self {
            inner: Arc::new(AppStateInner { cfg, limits }),
            store,
            metrics: Arc::new(ServiceMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.inner.limits
    }

    pub fn store(&self) -> Arc<FrequencyStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    /// Store gauges appended to the `/metrics` output.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("fizzbuzz_statistics_distinct_params", self.store.len() as u64),
            ("fizzbuzz_statistics_total_hits", self.store.total_hits()),
        ]
    }
}
