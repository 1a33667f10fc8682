use sha2::{Digest, Sha256};

/// Deterministic identity for a statement row: SHA-256 over the four
/// canonical fields joined with `|`, rendered as 64 lowercase hex chars.
///
/// Callers pass the canonical forms — ISO date, normalized payer, amount
/// with trailing fractional zeros trimmed, raw balance cell — and the empty
/// string for a missing field. The join preserves field position, so which
/// field is missing changes the digest.
pub fn fingerprint(date: &str, payer: &str, amount: &str, balance: &str) -> String {
    let seed = format!("{date}|{payer}|{amount}|{balance}");
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
