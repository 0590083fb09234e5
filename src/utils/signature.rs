use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 over the raw request body, keyed with the shared
/// call-provider secret.
pub fn sign(body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify an inbound webhook signature. The comparison runs through the MAC
/// verifier, which is constant-time; a malformed hex signature simply fails.
pub fn verify(body: &[u8], secret: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_body_with_its_signature_is_accepted() {
        let body = br#"{"event":"call_started","call":{"call_id":"call_1"}}"#;
        let sig = sign(body, "key_test");
        assert!(verify(body, "key_test", &sig));
    }

    #[test]
    fn tampered_body_with_unchanged_signature_is_rejected() {
        let body = br#"{"event":"call_started","call":{"call_id":"call_1"}}"#;
        let sig = sign(body, "key_test");
        let tampered = br#"{"event":"call_started","call":{"call_id":"call_2"}}"#;
        assert!(!verify(tampered, "key_test", &sig));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = b"{}";
        let sig = sign(body, "key_a");
        assert!(!verify(body, "key_b", &sig));
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        assert!(!verify(b"{}", "key_test", "not-hex!"));
    }
}
