//! Content-hash based task ids.
//!
//! Ids look like `fm-k3x9q2`: a short base36 slug derived from the task
//! content plus creation time. Hashing instead of counting keeps ids
//! stable across machines and lets independent databases create tasks
//! without coordinating a sequence.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Prefix for generated task ids.
pub const ID_PREFIX: &str = "fm";

/// Length of the base36 suffix after the prefix.
pub const TASK_ID_LENGTH: usize = 6;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encodes bytes as lowercase base36 (big-endian).
pub fn encode_base36(bytes: &[u8]) -> String {
    let mut num = BigUint::from_bytes_be(bytes);
    if num.is_zero() {
        return "0".to_string();
    }
    let base = BigUint::from(36u32);
    let mut digits = Vec::new();
    while !num.is_zero() {
        let rem = (&num % &base)
            .to_u32_digits()
            .first()
            .copied()
            .unwrap_or(0) as usize;
        digits.push(BASE36_ALPHABET[rem]);
        num /= &base;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).to_string()
}

/// Generates a task id from content, creator, timestamp, and nonce.
///
/// The nonce exists for collision handling: callers that find the
/// generated id already taken retry with the next nonce, which yields
/// an unrelated hash.
pub fn generate_task_id(
    prefix: &str,
    title: &str,
    creator: &str,
    timestamp: DateTime<Utc>,
    nonce: u32,
) -> String {
    let ts_nanos = timestamp.timestamp_nanos_opt().unwrap_or(0);
    let content = format!("{title}|{creator}|{ts_nanos}|{nonce}");
    let digest = Sha256::digest(content.as_bytes());

    // Eight digest bytes give ~12 base36 chars, comfortably more than
    // TASK_ID_LENGTH; pad on the left in the rare short case.
    let encoded = encode_base36(&digest[..8]);
    let padded = format!("{encoded:0>TASK_ID_LENGTH$}");
    let short = &padded[..TASK_ID_LENGTH];

    format!("{prefix}-{short}")
}
