//! Request parameters and their validation.
//!
//! Validation order is part of the client contract:
//! 1. all five keys must be present (reported together),
//! 2. labels must be non-empty (`labelA` first),
//! 3. integers must parse (`divisorA`, `divisorB`, `limit`),
//! 4. integers must be positive, in the same order,
//! 5. `limit` must not exceed the optional configured cap.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{FizzBuzzError, Result};

pub const DIVISOR_A: &str = "divisorA";
pub const DIVISOR_B: &str = "divisorB";
pub const LIMIT: &str = "limit";
pub const LABEL_A: &str = "labelA";
pub const LABEL_B: &str = "labelB";

/// Canonical order of the required query keys.
pub const REQUIRED: [&str; 5] = [DIVISOR_A, DIVISOR_B, LIMIT, LABEL_A, LABEL_B];

/// A validated generation request.
///
/// Equality and hashing cover all five fields, so two values built from the
/// same query compare equal and share one statistics slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParams {
    pub divisor_a: i64,
    pub divisor_b: i64,
    pub limit: i64,
    pub label_a: String,
    pub label_b: String,
}

/// Raw string-valued query parameters, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    values: HashMap<String, String>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `key=value` pairs. For repeated keys the first occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (k, v) in pairs {
            values.entry(k.into()).or_insert_with(|| v.into());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Optional resource limits applied on top of the base contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Upper bound for `limit`. `None` keeps sequences unbounded.
    pub max_limit: Option<i64>,
}

/// Validate raw query parameters into a [`RequestParams`].
pub fn validate(raw: &RawParams, limits: &ValidationLimits) -> Result<RequestParams> {
    if !REQUIRED.iter().all(|k| raw.contains(k)) {
        return Err(FizzBuzzError::MissingParameters);
    }

    let label_a = non_empty(raw, LABEL_A)?;
    let label_b = non_empty(raw, LABEL_B)?;

    let divisor_a = positive_int(raw, DIVISOR_A)?;
    let divisor_b = positive_int(raw, DIVISOR_B)?;
    let limit = positive_int(raw, LIMIT)?;

    if let Some(max) = limits.max_limit {
        if limit > max {
            return Err(FizzBuzzError::TooLarge { field: LIMIT, max });
        }
    }

    Ok(RequestParams {
        divisor_a,
        divisor_b,
        limit,
        label_a,
        label_b,
    })
}

fn non_empty(raw: &RawParams, field: &'static str) -> Result<String> {
    match raw.get(field) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FizzBuzzError::EmptyLabel(field)),
    }
}

fn positive_int(raw: &RawParams, field: &'static str) -> Result<i64> {
    let parsed: i64 = raw
        .get(field)
        .unwrap_or_default()
        .parse()
        .map_err(|_| FizzBuzzError::NotAnInteger(field))?;
    if parsed <= 0 {
        return Err(FizzBuzzError::NotPositive(field));
    }
    Ok(parsed)
}
