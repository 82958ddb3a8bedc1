//! Cached wall-clock time derived from accepted radio frames
//!
//! The device has no battery-backed clock. Wall-clock time is an offset
//! from the monotonic counter, learned from the last accepted frame and
//! extrapolated between frames. Until the first frame arrives the offset
//! is 0, so reported time is simply time-since-boot and flagged stale.

use crate::error::FrameError;
use crate::radio::frame::{decode_frame, BitFrame};

/// Seconds without an accepted frame before confidence degrades. One
/// expected radio cycle: a fresh frame should arrive every minute.
pub const STALE_AFTER_SECS: u64 = 60;

/// Freshness of the cached time estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeConfidence {
    /// A frame was accepted within the last radio cycle
    Valid,
    /// Extrapolated; usable but degraded
    Stale,
}

/// A wall-clock estimate at a specific moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTime {
    pub unix_timestamp: i64,
    pub confidence: TimeConfidence,
}

/// Owner of the last-known-good radio time
///
/// Explicit context object rather than a process-wide global: the caller
/// owns one and passes it wherever a time estimate is needed, so tests can
/// inject arbitrary cached times without a receiver attached. All methods
/// take the current monotonic counter value in seconds.
#[derive(Debug, Clone)]
pub struct RadioClock {
    // unix seconds minus monotonic seconds, as of the last accepted frame
    offset: i64,
    // monotonic second of the last accepted frame
    last_accepted: Option<u64>,
    stale_after: u64,
}

impl Default for RadioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioClock {
    pub fn new() -> Self {
        Self::with_stale_after(STALE_AFTER_SECS)
    }

    /// Override the staleness horizon (device configuration)
    pub fn with_stale_after(stale_after: u64) -> Self {
        Self {
            offset: 0,
            last_accepted: None,
            stale_after,
        }
    }

    /// Whether any frame has ever been accepted
    pub fn has_fix(&self) -> bool {
        self.last_accepted.is_some()
    }

    /// Feed one sampled frame
    ///
    /// On success the cached offset is replaced and the decoded minute
    /// returned. On any frame error the previous estimate is retained
    /// unchanged; the error is returned for logging and nothing else.
    pub fn observe_frame(
        &mut self,
        frame: &BitFrame,
        monotonic_now: u64,
    ) -> Result<DecodedTime, FrameError> {
        let unix_timestamp = decode_frame(frame)?;

        self.offset = unix_timestamp - monotonic_now as i64;
        self.last_accepted = Some(monotonic_now);

        tracing::info!(unix_timestamp, "radio time updated");
        Ok(DecodedTime {
            unix_timestamp,
            confidence: TimeConfidence::Valid,
        })
    }

    /// Current wall-clock estimate
    pub fn now(&self, monotonic_now: u64) -> DecodedTime {
        let confidence = match self.last_accepted {
            Some(at) if monotonic_now.saturating_sub(at) <= self.stale_after => {
                TimeConfidence::Valid
            }
            _ => TimeConfidence::Stale,
        };
        DecodedTime {
            unix_timestamp: monotonic_now as i64 + self.offset,
            confidence,
        }
    }
}
