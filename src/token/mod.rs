//! Capability token layout and verification
//!
//! Wire format (little-endian):
//!
//! ```text
//! offset  0..16   tag          (16-byte truncated authentication tag)
//! offset 16..24   valid_from   (u64 LE, Unix seconds)
//! offset 24..32   valid_until  (u64 LE, Unix seconds)
//! offset 32..end  identity     (UTF-8 text, remainder)
//! ```
//!
//! A token is consumed exactly once per unlock attempt, never mutated and
//! never persisted. Verification is pure: token bytes, device secret and
//! a current-time estimate in; an identity or a rejection out.

pub mod payload;

pub use payload::{PayloadCodec, RawTrailing};

use subtle::ConstantTimeEq;

use crate::crypto;
use crate::error::TokenError;

/// Length of the truncated authentication tag
pub const TAG_LEN: usize = 16;

/// Minimum token length: tag plus the two validity bounds
pub const MIN_TOKEN_LEN: usize = TAG_LEN + 8 + 8;

/// A parsed (but not yet verified) token
#[derive(Debug, Clone)]
pub struct Token {
    tag: [u8; TAG_LEN],
    valid_from: u64,
    valid_until: u64,
    identity: String,
}

impl Token {
    /// Parse the fixed layout; anything shorter than the signed header is
    /// malformed
    pub fn from_bytes(data: &[u8]) -> Result<Self, TokenError> {
        if data.len() < MIN_TOKEN_LEN {
            return Err(TokenError::Malformed {
                got: data.len(),
                minimum: MIN_TOKEN_LEN,
            });
        }

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&data[..TAG_LEN]);

        let valid_from = u64::from_le_bytes(data[16..24].try_into().expect("8 bytes"));
        let valid_until = u64::from_le_bytes(data[24..32].try_into().expect("8 bytes"));

        // undecodable identity bytes are replaced, not fatal: the tag
        // covers the raw bytes, so verification still decides
        let identity = String::from_utf8_lossy(&data[32..]).into_owned();

        Ok(Self {
            tag,
            valid_from,
            valid_until,
            identity,
        })
    }

    pub fn valid_from(&self) -> u64 {
        self.valid_from
    }

    pub fn valid_until(&self) -> u64 {
        self.valid_until
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Verify a token with the default payload codec
pub fn verify(
    token_bytes: &[u8],
    secret_key: &[u8],
    current_time: i64,
) -> Result<String, TokenError> {
    verify_with_codec(token_bytes, secret_key, current_time, &RawTrailing)
}

/// Verify a token against the device secret and the current time estimate
///
/// The recomputed tag is compared in constant time; an early-exit byte
/// comparison would leak how many tag bytes an attacker got right.
pub fn verify_with_codec(
    token_bytes: &[u8],
    secret_key: &[u8],
    current_time: i64,
    codec: &dyn PayloadCodec,
) -> Result<String, TokenError> {
    let token = Token::from_bytes(token_bytes)?;

    let payload = codec.signed_payload(&token_bytes[TAG_LEN..]);
    let expected = crypto::digest_two(secret_key, &payload);

    if !bool::from(expected[..TAG_LEN].ct_eq(&token.tag)) {
        return Err(TokenError::BadSignature);
    }

    // time estimates before the epoch collapse to it; the window bounds
    // are unsigned
    let current = u64::try_from(current_time).unwrap_or(0);

    if current < token.valid_from {
        return Err(TokenError::NotYetValid {
            valid_from: token.valid_from,
            current,
        });
    }
    if current > token.valid_until {
        return Err(TokenError::Expired {
            valid_until: token.valid_until,
            current,
        });
    }

    Ok(token.identity)
}
