//! Delivery-month extraction from contract identifiers.
//!
//! A futures contract identifier such as `rb2501.SHFE` encodes its delivery
//! month in the digit run after the product letters. Older venues used a
//! 3-digit form (`CF709`) where the leading digit carries the year within the
//! decade; those are normalized to the modern 4-digit code by prefixing `2`.

/// Sentinel returned when no delivery-month pattern matches.
pub const UNKNOWN_MONTH: &str = "Other";

/// Derives the normalized 4-digit delivery-month code from an identifier.
///
/// Total function, never fails. The exchange suffix after the first `.` is
/// discarded, then the first `letters + 2ddd` run wins, then the first
/// `letters + [6-9]dd` run (prefixed with `2`), then [`UNKNOWN_MONTH`].
///
/// This is a first-match heuristic, not a validated parse: an identifier that
/// happens to contain an unrelated `2`-led digit run matches on that run. The
/// behavior is kept as-is for compatibility with the producer's codes.
///
/// # Arguments
///
/// * `identifier` - Contract identifier, with or without a venue suffix.
///
/// # Returns
///
/// The 4-digit month code, or `"Other"`.
pub fn extract(identifier: &str) -> String {
    let code = identifier.split('.').next().unwrap_or("");
    if let Some(token) = find_month_token(code, |lead| lead == b'2', 3) {
        return token.to_string();
    }
    if let Some(token) = find_month_token(code, |lead| (b'6'..=b'9').contains(&lead), 2) {
        return format!("2{}", token);
    }
    UNKNOWN_MONTH.to_string()
}

/// Finds the leftmost digit run of `1 + tail_len` characters whose lead digit
/// satisfies `lead_ok` and that directly follows an ASCII letter.
fn find_month_token(code: &str, lead_ok: impl Fn(u8) -> bool, tail_len: usize) -> Option<&str> {
    let bytes = code.as_bytes();
    for idx in 1..bytes.len() {
        if !lead_ok(bytes[idx]) || !bytes[idx - 1].is_ascii_alphabetic() {
            continue;
        }
        if let Some(tail) = bytes.get(idx + 1..idx + 1 + tail_len) {
            if tail.iter().all(|byte| byte.is_ascii_digit()) {
                // All inspected bytes are ASCII, so the slice is char-aligned.
                return Some(&code[idx..idx + 1 + tail_len]);
            }
        }
    }
    None
}
