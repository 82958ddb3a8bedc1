//! Long-wave time-signal reception
//!
//! The receiver hardware samples one bit per second; a complete minute
//! yields a 59- or 60-bit frame carrying the time and date of the minute
//! that is just starting (frame, [`decode_frame`]). Accepted frames feed
//! the [`RadioClock`], the device's only source of wall-clock time.
//!
//! Frame rejections are a normal consequence of signal noise: the frame is
//! dropped, the previously decoded time stays untouched, and the only
//! externally visible effect is a degraded freshness flag once no frame
//! has been accepted for a whole radio cycle.

pub mod clock;
pub mod frame;

pub use clock::{DecodedTime, RadioClock, TimeConfidence, STALE_AFTER_SECS};
pub use frame::{decode_frame, BitFrame};
