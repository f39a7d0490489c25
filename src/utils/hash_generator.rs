//! Short hash generation.
//!
//! Hashes are drawn uniformly from a base62 alphabet using the thread-local
//! CSPRNG. They are independent of the URL they will point to, so generation
//! costs the same for every input and reveals nothing about the target.

use rand::Rng;

/// URL-safe base62 alphabet.
pub const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default number of characters in a generated hash (62^8 ≈ 2.18e14 values).
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Allowed range for the configured hash length.
pub const MIN_HASH_LENGTH: usize = 6;
pub const MAX_HASH_LENGTH: usize = 32;

/// Upper bound for anything accepted as a hash in a lookup path.
const MAX_LOOKUP_LENGTH: usize = 64;

/// Top-level path segments served by static routes next to `/{hash}`.
pub const RESERVED_HASHES: &[&str] = &["health", "api"];

/// Source of candidate hashes.
///
/// Implementations hold no state between calls and may be shared across
/// tasks. A candidate is only a proposal; the store decides whether it is free.
#[cfg_attr(test, mockall::automock)]
pub trait HashGenerator: Send + Sync {
    /// Produces a fresh candidate hash.
    fn generate(&self) -> String;
}

/// Generates fixed-length random base62 hashes.
#[derive(Debug, Clone)]
pub struct RandomHashGenerator {
    length: usize,
}

impl RandomHashGenerator {
    /// Creates a generator for hashes of `length` characters.
    ///
    /// `length` is clamped to `MIN_HASH_LENGTH..=MAX_HASH_LENGTH`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_HASH_LENGTH, MAX_HASH_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomHashGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_LENGTH)
    }
}

impl HashGenerator for RandomHashGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Returns true if `hash` could have been issued by this service.
///
/// Used to answer lookups for obviously bogus paths without a store
/// round-trip. Accepts any length up to 64 so that hashes issued under an
/// older `HASH_LENGTH` keep resolving.
pub fn is_well_formed_hash(hash: &str) -> bool {
    !hash.is_empty()
        && hash.len() <= MAX_LOOKUP_LENGTH
        && hash.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns true if `hash` would be shadowed by a static route.
pub fn is_reserved_hash(hash: &str) -> bool {
    RESERVED_HASHES.contains(&hash)
}
