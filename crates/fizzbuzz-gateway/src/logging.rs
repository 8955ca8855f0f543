//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogSection;

/// Install the global subscriber. `RUST_LOG` wins over `log.level` when set.
pub fn init(log: &LogSection) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let res = if log.is_json() {
        fmt().json().with_env_filter(filter).try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing subscriber already installed: {e}");
    }
}
