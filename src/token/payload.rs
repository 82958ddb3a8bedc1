//! Canonical signed-payload construction
//!
//! The issuing authority computes the authentication tag over
//! `secret_key || payload`, where `payload` is whatever byte string its
//! serializer produced for the signed fields. That serialization is an
//! external contract: it must be reproduced bit-for-bit, validated
//! against literal signed examples rather than guessed. The codec is
//! therefore pluggable.

/// Reconstructs the exact byte string the issuing side signed
pub trait PayloadCodec {
    /// Signed payload for a token whose bytes after the tag are `trailing`
    /// (`valid_from LE || valid_until LE || identity`)
    fn signed_payload(&self, trailing: &[u8]) -> Vec<u8>;
}

/// Default codec: the issuer signs exactly the trailing token bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTrailing;

impl PayloadCodec for RawTrailing {
    fn signed_payload(&self, trailing: &[u8]) -> Vec<u8> {
        trailing.to_vec()
    }
}
