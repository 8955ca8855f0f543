//! Gateway config loader (strict YAML + environment overrides).
//!
//! Precedence: defaults < YAML file < environment.

pub mod schema;

use std::fs;
use std::path::Path;

use fizzbuzz_core::error::{FizzBuzzError, Result};

pub use schema::{CorsSection, GatewayConfig, LimitsSection, LogSection, ServerSection};

/// Env var naming the YAML file.
pub const CONFIG_PATH_ENV: &str = "FIZZBUZZ_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "fizzbuzz.yaml";

/// Load config for the running process: file (if any) then env overrides.
///
/// A missing default file is not an error; a missing explicit file is.
pub fn load() -> Result<GatewayConfig> {
    let lookup = |k: &str| std::env::var(k).ok();

    let mut cfg = match lookup(CONFIG_PATH_ENV) {
        Some(path) => load_from_file(&path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
        None => GatewayConfig::default(),
    };

    apply_overrides(&mut cfg, lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FizzBuzzError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| FizzBuzzError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply environment overrides through `lookup` (injectable for tests).
///
/// Blank values are ignored, except `LOG_LEVEL` and `LOG_FORMAT` which
/// reject an explicitly blank value.
pub fn apply_overrides<F>(cfg: &mut GatewayConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| FizzBuzzError::Config(format!("invalid PORT: {port}")))?;
        let mut addr = cfg.server.listen_addr()?;
        addr.set_port(port);
        cfg.server.listen = addr.to_string();
    }
    if let Some(v) = get("REQUEST_TIMEOUT_MS") {
        cfg.server.request_timeout_ms = parse_u64("REQUEST_TIMEOUT_MS", &v)?;
    }
    if let Some(v) = get("SHUTDOWN_TIMEOUT_MS") {
        cfg.server.shutdown_timeout_ms = parse_u64("SHUTDOWN_TIMEOUT_MS", &v)?;
    }

    for (key, slot) in [("LOG_LEVEL", &mut cfg.log.level), ("LOG_FORMAT", &mut cfg.log.format)] {
        match lookup(key) {
            Some(v) if v.trim().is_empty() => {
                return Err(FizzBuzzError::Config(format!("{key} cannot be empty")));
            }
            Some(v) => *slot = v.trim().to_ascii_lowercase(),
            None => {}
        }
    }

    if let Some(v) = get("CORS_ALLOWED_ORIGINS") {
        let origins: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !origins.is_empty() {
            cfg.cors.allowed_origins = origins;
        }
    }
    if let Some(v) = get("MAX_LIMIT") {
        let max: i64 = v
            .trim()
            .parse()
            .map_err(|_| FizzBuzzError::Config(format!("invalid MAX_LIMIT: {v}")))?;
        cfg.limits.max_limit = Some(max);
    }

    Ok(())
}

fn parse_u64(key: &str, v: &str) -> Result<u64> {
    v.trim()
        .parse()
        .map_err(|_| FizzBuzzError::Config(format!("invalid {key}: {v}")))
}
