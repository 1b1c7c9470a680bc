// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact integrity — SHA-256 digests of everything a run writes, so two runs
// can be compared byte-for-byte without diffing PNGs.

use sha2::{Digest, Sha256};

/// Digest of an encoded artifact (PNG, truth JSON or manifest) as 64 lowercase
/// hex digits.
///
/// Callers hash the exact bytes they write to disk, so the digest recorded in
/// the run summary is also the digest of the file.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_lowercase_sha256_hex() {
        let digest = hash_bytes(br#"{"pages":[]}"#);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn one_changed_byte_changes_the_digest() {
        let truth = br#"{"pageId":"p01_clean_single"}"#.to_vec();
        let mut edited = truth.clone();
        edited[11] = b'2';
        assert_eq!(hash_bytes(&truth), hash_bytes(&truth.clone()));
        assert_ne!(hash_bytes(&truth), hash_bytes(&edited));
    }
}
