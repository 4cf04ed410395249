use sha3::{Digest, Keccak256};

/// `0x`-prefixed keccak digest of `parts` joined with `:`.
pub fn digest_hex(parts: &[&str]) -> String {
    let mut hasher = Keccak256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b":");
        }
        hasher.update(part.as_bytes());
    }
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// First `len` hex digits of the digest, for compact ids.
pub fn short_digest(parts: &[&str], len: usize) -> String {
    digest_hex(parts).chars().skip(2).take(len).collect()
}

/// Mock transaction hash for simulated settlement.
pub fn mock_tx_hash(kind: &str, trade_id: &str, timestamp: i64) -> String {
    digest_hex(&[kind, trade_id, &timestamp.to_string()])
}
