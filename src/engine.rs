//! Trust engine: the single owner of the device secret and the radio clock
//!
//! Two logical tasks drive it, cooperatively and single-threaded: the
//! radio task feeds sampled bitframes through [`TrustEngine::observe_frame`]
//! at most once per minute, and the unlock task calls
//! [`TrustEngine::authorize`] when a token arrives over the serial/QR
//! transport. Authorization never waits on the radio; it uses whatever
//! time estimate is currently cached.
//!
//! Only a bare grant/deny crosses the actuation boundary. The specific
//! rejection reason is kept in internal logs so a presenter of forged or
//! expired tokens learns nothing from the reply.

use crate::codec;
use crate::config::{LockConfig, SecretKey};
use crate::radio::{BitFrame, DecodedTime, RadioClock, TimeConfidence};
use crate::token;

/// Outcome of one unlock attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Token verified and inside its validity window
    Granted {
        identity: String,
        /// Freshness of the time estimate the decision was based on;
        /// callers may refuse stale grants by policy
        time_confidence: TimeConfidence,
    },
    /// Rejected, deliberately without detail
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

/// The firmware-side decision core
pub struct TrustEngine {
    secret_key: SecretKey,
    clock: RadioClock,
}

impl TrustEngine {
    pub fn new(config: LockConfig) -> Self {
        Self {
            secret_key: config.secret_key,
            clock: RadioClock::with_stale_after(config.stale_after),
        }
    }

    /// Feed one sampled radio bitframe (text form)
    ///
    /// Returns the decoded minute on success. Rejected frames are logged
    /// and dropped; the cached time estimate stays untouched.
    pub fn observe_frame(&mut self, line: &str, monotonic_now: u64) -> Option<DecodedTime> {
        let result = BitFrame::parse(line)
            .and_then(|frame| self.clock.observe_frame(&frame, monotonic_now));
        match result {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                tracing::debug!(%error, "radio frame dropped");
                None
            }
        }
    }

    /// Current wall-clock estimate
    pub fn current_time(&self, monotonic_now: u64) -> DecodedTime {
        self.clock.now(monotonic_now)
    }

    /// Decide one unlock attempt from the transport-encoded token text
    pub fn authorize(&self, encoded_token: &str, monotonic_now: u64) -> AccessDecision {
        let now = self.clock.now(monotonic_now);

        let token_bytes = match codec::decode(encoded_token.trim()) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, "unlock request rejected");
                return AccessDecision::Denied;
            }
        };

        match token::verify(&token_bytes, self.secret_key.as_bytes(), now.unix_timestamp) {
            Ok(identity) => {
                if !identity_is_presentable(&identity) {
                    tracing::warn!("unlock request rejected: unusable identity");
                    return AccessDecision::Denied;
                }
                tracing::info!(identity = %identity, confidence = ?now.confidence, "access granted");
                AccessDecision::Granted {
                    identity,
                    time_confidence: now.confidence,
                }
            }
            Err(error) => {
                tracing::warn!(%error, "unlock request rejected");
                AccessDecision::Denied
            }
        }
    }
}

// An identity ends up on displays and in audit lines; empty strings and
// control characters are refused even when the signature is good.
fn identity_is_presentable(identity: &str) -> bool {
    !identity.is_empty() && !identity.chars().any(|c| c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::radio::frame::tests::build_frame;
    use crate::token::tests::{issue_token, SECRET};

    // 2025-03-07 12:34 CET
    const FRIDAY_TS: u64 = 1_741_347_240;

    fn engine() -> TrustEngine {
        TrustEngine::new(LockConfig {
            secret_key: SecretKey::new(SECRET.to_vec()),
            stale_after: 60,
        })
    }

    fn synced_engine() -> TrustEngine {
        let mut engine = engine();
        let accepted = engine.observe_frame(&build_frame(34, 12, 7, 5, 3, 25, false), 1000);
        assert!(accepted.is_some());
        engine
    }

    #[test]
    fn test_grant_with_fresh_time() {
        let engine = synced_engine();
        let token = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"alice");

        let decision = engine.authorize(&codec::encode(&token), 1010);
        assert_eq!(
            decision,
            AccessDecision::Granted {
                identity: "alice".to_string(),
                time_confidence: TimeConfidence::Valid,
            }
        );
    }

    #[test]
    fn test_grant_reports_stale_time() {
        let engine = synced_engine();
        let token = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"alice");

        // 2 monotonic minutes after the last accepted frame
        let decision = engine.authorize(&codec::encode(&token), 1120);
        assert_eq!(
            decision,
            AccessDecision::Granted {
                identity: "alice".to_string(),
                time_confidence: TimeConfidence::Stale,
            }
        );
    }

    #[test]
    fn test_expired_token_denied_without_detail() {
        let engine = synced_engine();
        let token = issue_token(FRIDAY_TS - 7200, FRIDAY_TS - 3600, b"alice");
        assert_eq!(
            engine.authorize(&codec::encode(&token), 1010),
            AccessDecision::Denied
        );
    }

    #[test]
    fn test_forged_token_denied() {
        let engine = synced_engine();
        let mut token = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"alice");
        token[0] ^= 0xff;
        assert_eq!(
            engine.authorize(&codec::encode(&token), 1010),
            AccessDecision::Denied
        );
    }

    #[test]
    fn test_garbage_transport_text_denied() {
        let engine = synced_engine();
        assert_eq!(engine.authorize("not a token", 1010), AccessDecision::Denied);
        assert_eq!(engine.authorize("", 1010), AccessDecision::Denied);
    }

    #[test]
    fn test_control_character_identity_denied() {
        let engine = synced_engine();
        let token = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"al\x07ice");
        assert_eq!(
            engine.authorize(&codec::encode(&token), 1010),
            AccessDecision::Denied
        );

        let empty = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"");
        assert_eq!(
            engine.authorize(&codec::encode(&empty), 1010),
            AccessDecision::Denied
        );
    }

    #[test]
    fn test_rejected_frame_keeps_previous_time() {
        let mut engine = synced_engine();

        // corrupt minute parity; cached time must not move
        let mut corrupted = build_frame(59, 23, 7, 5, 3, 25, false);
        let flipped = if &corrupted[28..29] == "1" { "0" } else { "1" };
        corrupted.replace_range(28..29, flipped);
        assert!(engine.observe_frame(&corrupted, 1060).is_none());

        let token = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"alice");
        assert!(engine.authorize(&codec::encode(&token), 1060).is_granted());
    }

    #[test]
    fn test_no_fix_uses_boot_epoch_fallback() {
        let engine = engine();

        // boot time is seconds after the epoch; a token windowed around
        // the real wall clock denies, one windowed around boot grants
        let real_world = issue_token(FRIDAY_TS - 3600, FRIDAY_TS + 3600, b"alice");
        assert_eq!(
            engine.authorize(&codec::encode(&real_world), 1010),
            AccessDecision::Denied
        );

        let boot_window = issue_token(0, 3600, b"installer");
        let decision = engine.authorize(&codec::encode(&boot_window), 1010);
        assert_eq!(
            decision,
            AccessDecision::Granted {
                identity: "installer".to_string(),
                time_confidence: TimeConfidence::Stale,
            }
        );
    }
}
