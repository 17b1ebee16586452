//! # Digest Utilities
//!
//! Keyed and unkeyed SHA-256 digests used for password and identity
//! integrity checks.
//!
//! All textual digests use standard (padded) base64 unless the function
//! name says otherwise. Comparisons against caller-supplied digests are
//! constant-time.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes HMAC-SHA256 of `message` keyed by `secret`, base64 encoded.
pub fn compute_hmac256(message: &str, secret: &str) -> String {
    base64_encode(&compute_hmac256_bytes(message, secret))
}

/// Returns true if `message_mac` is a valid base64 HMAC-SHA256 tag of `message`.
///
/// A tag that is not valid base64 never matches.
pub fn check_mac(message: &str, message_mac: &str, secret: &str) -> bool {
    let check_bytes = match base64_decode(message_mac) {
        Ok(b) => b,
        Err(_) => return false,
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    mac.verify_slice(&check_bytes).is_ok()
}

/// Raw HMAC-SHA256 tag of `message` keyed by `secret`.
pub fn compute_hmac256_bytes(message: &str, secret: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Raw SHA-256 digest of `message`.
pub fn compute_sha256_bytes(message: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hasher.finalize().to_vec()
}

/// SHA-256 digest of `message`, base64 encoded.
pub fn compute_sha256_base64(message: &str) -> String {
    base64_encode(&compute_sha256_bytes(message))
}

/// SHA-256 digest of `message` as uppercase hex.
pub fn compute_sha256_hex_upper(message: &str) -> String {
    hex_encode(&compute_sha256_bytes(message), true)
}

/// SHA-256 digest of `message` as lowercase hex.
pub fn compute_sha256_hex_lower(message: &str) -> String {
    hex_encode(&compute_sha256_bytes(message), false)
}

/// Hex encoding in either case.
pub fn hex_encode(bytes: &[u8], upper: bool) -> String {
    bytes
        .iter()
        .map(|b| if upper { format!("{:02X}", b) } else { format!("{:02x}", b) })
        .collect()
}

/// Returns true if `expected_base64` is the base64 SHA-256 digest of `message`.
pub fn check_sha256(message: &str, expected_base64: &str) -> bool {
    let check_bytes = match base64_decode(expected_base64) {
        Ok(b) => b,
        Err(_) => return false,
    };
    constant_time_eq(&check_bytes, &compute_sha256_bytes(message))
}

/// Standard base64 encoding.
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Standard base64 decoding.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

/// Constant-time comparison of two byte slices
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            compute_sha256_hex_lower("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            compute_sha256_hex_upper("abc"),
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
    }

    #[test]
    fn test_sha256_base64_checks() {
        let digest = compute_sha256_base64("secret-password");
        assert!(check_sha256("secret-password", &digest));
        assert!(!check_sha256("other-password", &digest));
    }

    #[test]
    fn test_check_sha256_rejects_bad_base64() {
        assert!(!check_sha256("anything", "not base64!!"));
    }

    #[test]
    fn test_check_sha256_rejects_truncated_digest() {
        let digest = compute_sha256_bytes("abc");
        let truncated = base64_encode(&digest[..16]);
        assert!(!check_sha256("abc", &truncated));
    }

    #[test]
    fn test_hmac_known_vector() {
        // RFC 4231 test case 2
        let tag = compute_hmac256("what do ya want for nothing?", "Jefe");
        let bytes = base64_decode(&tag).unwrap();
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_check_mac() {
        let tag = compute_hmac256("payload", "key");
        assert!(check_mac("payload", &tag, "key"));
        assert!(!check_mac("payload", &tag, "other-key"));
        assert!(!check_mac("tampered", &tag, "key"));
        assert!(!check_mac("payload", "%%%", "key"));
    }

    #[test]
    fn test_base64_roundtrip_is_standard_alphabet() {
        assert_eq!(base64_encode(&[0xfb, 0xff]), "+/8=");
        assert_eq!(base64_decode("+/8=").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_constant_time_comparison() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hello!"));
    }
}
