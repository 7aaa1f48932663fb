use std::num::NonZeroUsize;

use sha2::{Digest, Sha256};

use crate::recency::SelectionScope;

/// Seeds are kept below 2^32 so `seed * salt` stays exact in an f64.
pub const SEED_MODULUS: u64 = 1 << 32;

/// Stands in for a folded seed of 0, where `sin(0) = 0` would pin every
/// dimension to index 0.
pub const ZERO_SEED_REPLACEMENT: u64 = SEED_MODULUS - 1;

const HASH_SCALE: f64 = 10_000.0;
const POST_INDEX_STRIDE: u64 = 7_919;

/// `floor(|sin(seed * salt)| * 10000) mod modulus`.
pub fn hash_to_index(seed: u64, salt: u64, modulus: NonZeroUsize) -> usize {
    let product = seed as f64 * salt as f64;
    let bucket = (product.sin().abs() * HASH_SCALE).floor() as usize;
    bucket % modulus.get()
}

/// Seed for a call that did not supply one: wall-clock millis, the post index and
/// a stable per-scope entropy value.
pub fn derive_seed(scope: &SelectionScope, post_index: u64, now_millis: u64) -> u64 {
    normalize_seed(
        now_millis
            .wrapping_add(post_index.wrapping_mul(POST_INDEX_STRIDE))
            .wrapping_add(scope_entropy(scope)),
    )
}

pub fn scope_entropy(scope: &SelectionScope) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(scope.calendar_id.as_bytes());
    hasher.update([0u8]);
    if let Some(brand_id) = &scope.brand_id {
        hasher.update(brand_id.as_bytes());
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Folds a seed into `1..SEED_MODULUS`.
pub fn normalize_seed(seed: u64) -> u64 {
    match seed % SEED_MODULUS {
        0 => ZERO_SEED_REPLACEMENT,
        folded => folded,
    }
}
