#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use fizzbuzz_gateway::config::{self, GatewayConfig};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |k| map.get(k).cloned()
}

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8080"
  request_timeot_ms: 100 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
    assert!(err.to_string().contains("invalid yaml"), "{err}");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.server.request_timeout_ms, 60_000);
    assert_eq!(cfg.server.shutdown_timeout_ms, 30_000);
    assert_eq!(cfg.log.level, "info");
    assert_eq!(cfg.log.format, "json");
    assert_eq!(cfg.cors.allowed_origins, vec!["*".to_string()]);
    assert_eq!(cfg.limits.max_limit, None);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9000"
  request_timeout_ms: 5000
  shutdown_timeout_ms: 1000
log:
  level: debug
  format: text
cors:
  allowed_origins: ["https://a.example", "https://b.example"]
limits:
  max_limit: 10000
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 9000);
    assert!(!cfg.log.is_json());
    assert!(cfg.cors.allows("https://b.example"));
    assert!(!cfg.cors.allows_any());
    assert_eq!(cfg.limits.validation_limits().max_limit, Some(10_000));
}

#[test]
fn rejects_bad_values() {
    for (yaml, needle) in [
        ("version: 2\n", "unsupported config version"),
        ("version: 1\nlog:\n  level: verbose\n", "invalid log level"),
        ("version: 1\nlog:\n  format: xml\n", "invalid log format"),
        ("version: 1\nserver:\n  request_timeout_ms: 0\n", "request_timeout_ms"),
        ("version: 1\nserver:\n  listen: nowhere\n", "server.listen"),
        ("version: 1\nlimits:\n  max_limit: 0\n", "max_limit"),
    ] {
        let err = config::load_from_str(yaml).expect_err(yaml);
        assert!(err.to_string().contains(needle), "{yaml} -> {err}");
    }
}

#[test]
fn env_overrides_take_precedence() {
    let mut cfg = GatewayConfig::default();
    config::apply_overrides(
        &mut cfg,
        env(&[
            ("PORT", "9090"),
            ("REQUEST_TIMEOUT_MS", "1500"),
            ("LOG_LEVEL", "WARN"),
            ("LOG_FORMAT", "text"),
            ("CORS_ALLOWED_ORIGINS", " https://a.example , ,https://b.example"),
            ("MAX_LIMIT", "500"),
        ]),
    )
    .unwrap();
    cfg.validate().unwrap();

    assert_eq!(cfg.server.listen, "0.0.0.0:9090");
    assert_eq!(cfg.server.request_timeout_ms, 1500);
    assert_eq!(cfg.log.level, "warn");
    assert_eq!(cfg.log.format, "text");
    assert_eq!(cfg.cors.allowed_origins, vec!["https://a.example", "https://b.example"]);
    assert_eq!(cfg.limits.max_limit, Some(500));
}

#[test]
fn blank_env_values() {
    let mut cfg = GatewayConfig::default();
    config::apply_overrides(&mut cfg, env(&[("PORT", "  "), ("CORS_ALLOWED_ORIGINS", "")])).unwrap();
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert!(cfg.cors.allows_any());

    let err = config::apply_overrides(&mut cfg, env(&[("LOG_LEVEL", " ")])).expect_err("blank level");
    assert!(err.to_string().contains("LOG_LEVEL cannot be empty"));

    let err = config::apply_overrides(&mut cfg, env(&[("REQUEST_TIMEOUT_MS", "soon")])).expect_err("bad number");
    assert!(err.to_string().contains("REQUEST_TIMEOUT_MS"));
}
