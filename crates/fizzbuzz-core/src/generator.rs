//! Labeled integer sequence generation (pure, total).

/// Preallocation cap so a huge `limit` grows the output on demand
/// instead of reserving it all up front.
const MAX_PREALLOC: usize = 1 << 16;

/// Generate the labeled sequence for `1..=limit`.
///
/// Position `n` becomes `label_a + label_b` when both divisors divide it,
/// `label_a` or `label_b` when only one does, and the decimal form of `n`
/// otherwise. A divisor of `0` never divides. A non-positive `limit`
/// yields an empty sequence.
pub fn generate(divisor_a: i64, divisor_b: i64, limit: i64, label_a: &str, label_b: &str) -> Vec<String> {
    if limit <= 0 {
        return Vec::new();
    }

    let cap = usize::try_from(limit).map_or(MAX_PREALLOC, |l| l.min(MAX_PREALLOC));
    let mut out = Vec::with_capacity(cap);

    for n in 1..=limit {
        let token = match (divides(divisor_a, n), divides(divisor_b, n)) {
            (true, true) => format!("{label_a}{label_b}"),
            (true, false) => label_a.to_string(),
            (false, true) => label_b.to_string(),
            (false, false) => n.to_string(),
        };
        out.push(token);
    }
    out
}

/// `checked_rem` is `None` for a zero divisor, which reads as "never divides".
fn divides(divisor: i64, n: i64) -> bool {
    n.checked_rem(divisor) == Some(0)
}
