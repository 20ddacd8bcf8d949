//! Identifier generation
//!
//! All IDs use the format: `{prefix}_{unix-ms}_{counter}{random}`
//! Example: `task_1767225600000_3k9x2mq7a1c`
//!
//! The process-wide counter keeps IDs unique when several generation runs
//! share a millisecond; the random suffix keeps them unique across processes.
//!
//! The timestamp is read from the wall clock, not from an injected `Clock`.
//! IDs are opaque, so a fixed clock in tests changes no planning output.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh identifier with the given prefix
pub fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}{}", prefix, millis, base36(seq), random_suffix())
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

fn base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
