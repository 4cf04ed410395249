// Hashing helpers for mock ids and tx hashes
pub mod hash;
