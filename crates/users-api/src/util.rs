use chrono::{DateTime, Utc};

use getrandom::fill;

/// Alphabet of short public ids: lowercase, without lookalikes (`0`, `1`,
/// `i`, `l`, `o`).
const GUID_ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyz";
const GUID_LEN: usize = 5;

pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

pub fn ts_to_rfc3339(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_default()
        .to_rfc3339()
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    fill(&mut out).expect("Failed to generate random bytes");
    out
}

/// Five-character public id, e.g. `k4x9q`.
pub fn generate_guid() -> String {
    random_bytes(GUID_LEN)
        .into_iter()
        .map(|b| GUID_ALPHABET[b as usize % GUID_ALPHABET.len()] as char)
        .collect()
}

/// 128-bit token, hex-encoded.
pub fn generate_token() -> String {
    hex::encode(random_bytes(16))
}
