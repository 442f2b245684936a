//! Passive device fingerprinting from request headers.
//!
//! The fingerprint is a coarse stability signal, not an identity: it groups
//! requests that look like the same browser install so device allow-lists and
//! the anomaly heuristics have something cheaper than an account to key on.

use http::HeaderMap;

/// Headers folded into the fingerprint, in hash order. Changing this list or
/// its order changes every stored fingerprint.
const FINGERPRINT_HEADERS: [&str; 5] = [
    "user-agent",
    "accept-language",
    "accept-encoding",
    "sec-ch-ua",
    "sec-ch-ua-platform",
];

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// 32-bit rolling hash, `h = h * 31 + c` with wrapping arithmetic.
fn rolling_hash(input: &str) -> i32 {
    let mut hash: i32 = 0;
    for c in input.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as i32);
    }
    hash
}

/// Derive a fingerprint string from the request headers.
///
/// Missing headers contribute an empty segment so the shape of the input
/// stays fixed. The result is `fp_` plus the hash in base 36.
pub fn device_fingerprint(headers: &HeaderMap) -> String {
    let joined = FINGERPRINT_HEADERS
        .iter()
        .map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
        })
        .collect::<Vec<_>>()
        .join("|");

    format!("fp_{}", base36(rolling_hash(&joined).unsigned_abs()))
}
