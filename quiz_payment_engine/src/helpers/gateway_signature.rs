//! # Gateway notification signatures
//!
//! The payment gateway signs every notification it sends us with a shared server key. The signature is not an HMAC;
//! it is a plain SHA-512 digest over the concatenation of a handful of notification fields and the key:
//!
//! ```text
//!    hex(SHA512({order_id}{status_code}{gross_amount}{server_key}))
//! ```
//!
//! The fields are used exactly as they appear on the wire (e.g. `"10000.00"`, not `"10000"`), and the digest is
//! compared against `signature_key` as a lowercase hex string. Both the field order and the encoding are fixed by the
//! gateway, so we cannot change them.
use qpg_common::Secret;
use sha2::{Digest, Sha512};

/// Checks notification signatures against the shared server key.
///
/// The verifier is constructed once from configuration and handed to whoever needs it. It holds no other state.
#[derive(Clone, Debug)]
pub struct SignatureVerifier {
    server_key: Secret<String>,
}

impl SignatureVerifier {
    pub fn new(server_key: Secret<String>) -> Self {
        Self { server_key }
    }

    /// Calculates the signature the gateway would have sent for the given fields.
    pub fn expected_signature(&self, order_id: &str, status_code: &str, gross_amount: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(order_id.as_bytes());
        hasher.update(status_code.as_bytes());
        hasher.update(gross_amount.as_bytes());
        hasher.update(self.server_key.reveal().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns true iff `signature` is exactly the expected signature for the given fields. The comparison is
    /// case-sensitive.
    pub fn verify(&self, order_id: &str, status_code: &str, gross_amount: &str, signature: &str) -> bool {
        self.expected_signature(order_id, status_code, gross_amount) == signature
    }
}
