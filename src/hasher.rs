//! Fingerprinting: turn arbitrary bytes into a 40-hex-char key.

use sha1::{Digest, Sha1};

/// A replaceable hashing strategy. The produced key width (40 hex chars) is
/// part of the on-disk format, so swapping the algorithm is only safe if the
/// replacement also produces 40-char hex digests.
pub trait Hasher {
    fn hash(&self, bytes: &[u8]) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha1Hasher;

impl Hasher for Sha1Hasher {
    fn hash(&self, bytes: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_40_hex_chars() {
        let h = Sha1Hasher.hash(b"hello");
        assert_eq!(h.len(), 40);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(Sha1Hasher.hash(b"same"), Sha1Hasher.hash(b"same"));
    }

    #[test]
    fn hash_differs_on_different_input() {
        assert_ne!(Sha1Hasher.hash(b"a"), Sha1Hasher.hash(b"b"));
    }
}
