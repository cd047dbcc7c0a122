//! Canonical serialization and hashing for ledger records
//!
//! Fingerprints are SHA-256 digests over a deterministic byte encoding:
//! - integers are written big-endian with a fixed width
//! - strings are UTF-8, prefixed with their byte length as u32
//! - enum variants are prefixed with a one byte tag
//!
//! Length prefixes keep the encoding unambiguous, so `("ab", "c")` and
//! `("a", "bc")` never hash to the same value.

use crate::types::Fingerprint;
use sha2::{Digest, Sha256};

/// Canonical serializer
#[derive(Debug, Default)]
pub struct CanonicalSerializer {
    buffer: Vec<u8>,
}

impl CanonicalSerializer {
    /// Create new serializer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Write a single tag byte
    pub fn write_tag(&mut self, tag: u8) {
        self.buffer.push(tag);
    }

    /// Write u32 (big-endian)
    pub fn write_u32(&mut self, n: u32) {
        self.buffer.extend_from_slice(&n.to_be_bytes());
    }

    /// Write u64 (big-endian)
    pub fn write_u64(&mut self, n: u64) {
        self.buffer.extend_from_slice(&n.to_be_bytes());
    }

    /// Write i64 (big-endian)
    pub fn write_i64(&mut self, n: i64) {
        self.buffer.extend_from_slice(&n.to_be_bytes());
    }

    /// Write string (length-prefixed)
    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        // A truncated prefix would make the encoding ambiguous
        let len =
            u32::try_from(bytes.len()).expect("canonical string longer than u32::MAX bytes");
        self.write_u32(len);
        self.buffer.extend_from_slice(bytes);
    }

    /// Finalize and return bytes
    pub fn finalize(self) -> Vec<u8> {
        self.buffer
    }

    /// Hash the buffer into a fingerprint
    pub fn fingerprint(self) -> Fingerprint {
        Fingerprint::from_digest(hash_bytes(&self.buffer))
    }
}

/// Types with a canonical byte encoding
pub trait Canonical {
    /// Append this value's canonical encoding to the serializer
    fn write_canonical(&self, ser: &mut CanonicalSerializer);

    /// Canonical encoding as an owned buffer
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut ser = CanonicalSerializer::new();
        self.write_canonical(&mut ser);
        ser.finalize()
    }
}

/// Hash arbitrary bytes using SHA-256
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        let hash1 = hash_bytes(b"test data");
        let hash2 = hash_bytes(b"test data");
        assert_eq!(hash1, hash2);

        let hash3 = hash_bytes(b"different data");
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_known_sha256_vector() {
        // FIPS 180-2 "abc"
        assert_eq!(
            hex::encode(hash_bytes(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_strings_are_length_prefixed() {
        let mut a = CanonicalSerializer::new();
        a.write_str("ab");
        a.write_str("c");

        let mut b = CanonicalSerializer::new();
        b.write_str("a");
        b.write_str("bc");

        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_string_prefix_counts_bytes() {
        let mut ser = CanonicalSerializer::new();
        ser.write_str("é");
        assert_eq!(ser.finalize(), vec![0, 0, 0, 2, 0xc3, 0xa9]);
    }

    #[test]
    fn test_integer_layout() {
        let mut ser = CanonicalSerializer::new();
        ser.write_tag(7);
        ser.write_u32(1);
        ser.write_u64(2);
        ser.write_i64(-1);
        let bytes = ser.finalize();

        assert_eq!(bytes.len(), 1 + 4 + 8 + 8);
        assert_eq!(bytes[0], 7);
        assert_eq!(&bytes[1..5], &[0, 0, 0, 1]);
        assert_eq!(&bytes[5..13], &[0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(&bytes[13..], &[0xff; 8]);
    }
}
