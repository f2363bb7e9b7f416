mod gateway_signature;

pub use gateway_signature::SignatureVerifier;
