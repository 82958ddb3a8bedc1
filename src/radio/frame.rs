//! Per-minute bitframe layout and decoding
//!
//! Fixed bit offsets, one bit per second from second 0:
//!
//! ```text
//! bit  0         start-of-minute marker, always 0
//! bits 17/18     CEST/CET flag pair (exactly one set)
//! bit  20        start-of-time marker, always 1
//! bits 21..=27   minute, BCD LSB-first (weights 1 2 4 8 10 20 40)
//! bit  28        even parity over bits 21..=27
//! bits 29..=34   hour, BCD LSB-first (weights 1 2 4 8 10 20)
//! bit  35        even parity over bits 29..=34
//! bits 36..=41   day of month, BCD LSB-first (weights 1 2 4 8 10 20)
//! bits 42..=44   day of week 1..=7, LSB-first
//! bits 45..=49   month, BCD LSB-first (weights 1 2 4 8 10)
//! bits 50..=57   year of century, BCD LSB-first (weights 1 2 4 8 10 20 40 80)
//! bit  58        even parity over bits 36..=57
//! bit  59        leap-second slot, always 0, may be absent from the sample
//! ```

use crate::calendar::CalendarDate;
use crate::error::{FieldGroup, FrameError};

/// Bits in a frame without the leap-second slot
pub const MIN_BITS: usize = 59;

/// Bits in a frame with the leap-second slot
pub const MAX_BITS: usize = 60;

/// One sampled minute of the radio signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitFrame {
    bits: [bool; MAX_BITS],
    len: usize,
}

impl BitFrame {
    /// Parse the text form: one `0`/`1` character per sampled second
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let raw = text.as_bytes();
        if raw.len() < MIN_BITS || raw.len() > MAX_BITS {
            return Err(FrameError::WrongBitCount { got: raw.len() });
        }

        let mut bits = [false; MAX_BITS];
        for (position, &sample) in raw.iter().enumerate() {
            bits[position] = match sample {
                b'0' => false,
                b'1' => true,
                _ => return Err(FrameError::InvalidSample { position }),
            };
        }

        Ok(Self {
            bits,
            len: raw.len(),
        })
    }

    /// Number of sampled bits (59 or 60)
    pub fn bit_count(&self) -> usize {
        self.len
    }

    fn bit(&self, index: usize) -> bool {
        self.bits[index]
    }

    // Even parity over an inclusive bit span: 0 when the count of set bits
    // is even.
    fn parity(&self, start: usize, end: usize) -> u8 {
        let mut result = 0u8;
        for index in start..=end {
            if self.bit(index) {
                result ^= 1;
            }
        }
        result
    }
}

const ONES_WEIGHTS: [u8; 4] = [1, 2, 4, 8];
const TENS_WEIGHTS: [u8; 4] = [10, 20, 40, 80];

// Decode a BCD subfield: `ones` bits for the units digit, `tens` bits for
// the tens digit, LSB first. The units digit must stay below 10.
fn bcd_field(
    frame: &BitFrame,
    start: usize,
    ones: usize,
    tens: usize,
    field: &'static str,
) -> Result<u8, FrameError> {
    let mut value = 0u8;
    for (index, &weight) in ONES_WEIGHTS.iter().enumerate().take(ones) {
        if frame.bit(start + index) {
            value += weight;
        }
    }
    if value >= 10 {
        return Err(FrameError::FieldRange { field, value });
    }
    for (index, &weight) in TENS_WEIGHTS.iter().enumerate().take(tens) {
        if frame.bit(start + ones + index) {
            value += weight;
        }
    }
    Ok(value)
}

/// Decode one frame into the Unix timestamp of the minute it announces
///
/// The transmitted time is local (CET or CEST per the flag pair); the
/// result is converted to UTC. Any marker, range, flag, or parity
/// violation rejects the whole frame.
pub fn decode_frame(frame: &BitFrame) -> Result<i64, FrameError> {
    // the leap-second slot carries no data and must be 0 when sampled
    if frame.bit_count() == MAX_BITS && frame.bit(59) {
        return Err(FrameError::MarkerMismatch { bit: 59 });
    }
    if frame.bit(0) {
        return Err(FrameError::MarkerMismatch { bit: 0 });
    }
    if !frame.bit(20) {
        return Err(FrameError::MarkerMismatch { bit: 20 });
    }

    if frame.parity(21, 28) != 0 {
        return Err(FrameError::ParityFailure {
            group: FieldGroup::Minute,
        });
    }
    if frame.parity(29, 35) != 0 {
        return Err(FrameError::ParityFailure {
            group: FieldGroup::Hour,
        });
    }
    if frame.parity(36, 58) != 0 {
        return Err(FrameError::ParityFailure {
            group: FieldGroup::Date,
        });
    }

    let summer = frame.bit(17);
    let winter = frame.bit(18);
    if summer == winter {
        return Err(FrameError::UtcOffsetConflict);
    }
    let utc_offset_hours: i64 = if summer { 2 } else { 1 };

    let minute = bcd_field(frame, 21, 4, 3, "minute")?;
    if minute >= 60 {
        return Err(FrameError::FieldRange {
            field: "minute",
            value: minute,
        });
    }

    let hour = bcd_field(frame, 29, 4, 2, "hour")?;
    if hour >= 24 {
        return Err(FrameError::FieldRange {
            field: "hour",
            value: hour,
        });
    }

    let day_of_month = bcd_field(frame, 36, 4, 2, "day-of-month")?;
    if day_of_month == 0 {
        return Err(FrameError::FieldRange {
            field: "day-of-month",
            value: day_of_month,
        });
    }

    let mut weekday = 0u8;
    for (index, weight) in [1u8, 2, 4].into_iter().enumerate() {
        if frame.bit(42 + index) {
            weekday += weight;
        }
    }
    if weekday == 0 {
        return Err(FrameError::FieldRange {
            field: "weekday",
            value: weekday,
        });
    }

    let month = bcd_field(frame, 45, 4, 1, "month")?;
    if month == 0 || month > 12 {
        return Err(FrameError::FieldRange {
            field: "month",
            value: month,
        });
    }

    let year_of_century = bcd_field(frame, 50, 4, 4, "year")?;
    if year_of_century >= 100 {
        return Err(FrameError::FieldRange {
            field: "year",
            value: year_of_century,
        });
    }

    let date = CalendarDate::new(2000 + year_of_century as u32, month, day_of_month)
        .map_err(|_| FrameError::FieldRange {
        field: "day-of-month",
        value: day_of_month,
    })?;

    // the transmitted weekday is redundant with the date; use it as one
    // more integrity check on the frame
    if date.day_of_week() != weekday {
        return Err(FrameError::WeekdayMismatch {
            transmitted: weekday,
            computed: date.day_of_week(),
        });
    }

    let midnight = date
        .to_timestamp(0)
        .expect("midnight is a valid time of day");
    Ok(midnight + 3600 * hour as i64 + 60 * minute as i64 - 3600 * utc_offset_hours)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // Build the text form of a frame from its field values, with correct
    // markers and parity. Tests then corrupt individual bits from here.
    pub(crate) fn build_frame(
        minute: u8,
        hour: u8,
        day: u8,
        weekday: u8,
        month: u8,
        year_of_century: u8,
        summer: bool,
    ) -> String {
        let mut bits = [false; MIN_BITS];
        bits[if summer { 17 } else { 18 }] = true;
        bits[20] = true;

        set_bcd(&mut bits, 21, 4, 3, minute);
        set_bcd(&mut bits, 29, 4, 2, hour);
        set_bcd(&mut bits, 36, 4, 2, day);
        for (index, weight) in [1u8, 2, 4].into_iter().enumerate() {
            bits[42 + index] = weekday & weight != 0;
        }
        set_bcd(&mut bits, 45, 4, 1, month);
        set_bcd(&mut bits, 50, 4, 4, year_of_century);

        bits[28] = span_parity(&bits, 21, 27);
        bits[35] = span_parity(&bits, 29, 34);
        bits[58] = span_parity(&bits, 36, 57);

        bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    fn set_bcd(bits: &mut [bool], start: usize, ones: usize, tens: usize, value: u8) {
        let units = value % 10;
        let tens_digit = value / 10;
        for index in 0..ones {
            bits[start + index] = units & (1 << index) != 0;
        }
        for index in 0..tens {
            bits[start + ones + index] = tens_digit & (1 << index) != 0;
        }
    }

    fn span_parity(bits: &[bool], start: usize, end: usize) -> bool {
        bits[start..=end].iter().filter(|&&b| b).count() % 2 != 0
    }

    fn flip(frame: &str, index: usize) -> String {
        let mut raw: Vec<u8> = frame.bytes().collect();
        raw[index] = if raw[index] == b'1' { b'0' } else { b'1' };
        String::from_utf8(raw).unwrap()
    }

    // 2025-03-07 (a Friday) 12:34 CET = 11:34 UTC
    const FRIDAY_TS: i64 = 1_741_347_240;

    fn friday_frame() -> String {
        build_frame(34, 12, 7, 5, 3, 25, false)
    }

    #[test]
    fn test_decode_winter_frame() {
        let frame = BitFrame::parse(&friday_frame()).unwrap();
        assert_eq!(decode_frame(&frame).unwrap(), FRIDAY_TS);
    }

    #[test]
    fn test_decode_summer_frame() {
        // CEST announces UTC+2: one hour earlier in UTC
        let text = build_frame(34, 12, 7, 5, 3, 25, true);
        let frame = BitFrame::parse(&text).unwrap();
        assert_eq!(decode_frame(&frame).unwrap(), FRIDAY_TS - 3600);
    }

    #[test]
    fn test_59_and_60_bits_equivalent() {
        let text = friday_frame();
        assert_eq!(text.len(), 59);
        let with_slot = format!("{text}0");

        let short = BitFrame::parse(&text).unwrap();
        let long = BitFrame::parse(&with_slot).unwrap();
        assert_eq!(decode_frame(&short).unwrap(), decode_frame(&long).unwrap());
    }

    #[test]
    fn test_leap_second_slot_must_be_zero() {
        let text = format!("{}1", friday_frame());
        let frame = BitFrame::parse(&text).unwrap();
        assert_eq!(
            decode_frame(&frame),
            Err(FrameError::MarkerMismatch { bit: 59 })
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            BitFrame::parse("01"),
            Err(FrameError::WrongBitCount { got: 2 })
        );
        assert_eq!(
            BitFrame::parse(&"0".repeat(61)),
            Err(FrameError::WrongBitCount { got: 61 })
        );
        let mut text = friday_frame();
        text.replace_range(5..6, "x");
        assert_eq!(
            BitFrame::parse(&text),
            Err(FrameError::InvalidSample { position: 5 })
        );
    }

    #[test]
    fn test_marker_bits() {
        let frame = BitFrame::parse(&flip(&friday_frame(), 0)).unwrap();
        assert_eq!(decode_frame(&frame), Err(FrameError::MarkerMismatch { bit: 0 }));

        let frame = BitFrame::parse(&flip(&friday_frame(), 20)).unwrap();
        assert_eq!(decode_frame(&frame), Err(FrameError::MarkerMismatch { bit: 20 }));
    }

    #[test]
    fn test_flipped_parity_bits() {
        for (bit, group) in [
            (28usize, FieldGroup::Minute),
            (35, FieldGroup::Hour),
            (58, FieldGroup::Date),
        ] {
            let frame = BitFrame::parse(&flip(&friday_frame(), bit)).unwrap();
            assert_eq!(
                decode_frame(&frame),
                Err(FrameError::ParityFailure { group }),
                "parity bit {bit}"
            );
        }
    }

    #[test]
    fn test_flipped_data_bit_hits_parity() {
        // a single corrupted data bit must never survive to a timestamp
        for bit in [21usize, 27, 29, 34, 36, 44, 45, 50, 57] {
            let frame = BitFrame::parse(&flip(&friday_frame(), bit)).unwrap();
            assert!(
                matches!(
                    decode_frame(&frame),
                    Err(FrameError::ParityFailure { .. })
                ),
                "data bit {bit}"
            );
        }
    }

    #[test]
    fn test_utc_offset_flags_must_be_exclusive() {
        // both flags set
        let frame = BitFrame::parse(&flip(&friday_frame(), 17)).unwrap();
        assert_eq!(decode_frame(&frame), Err(FrameError::UtcOffsetConflict));

        // neither flag set
        let frame = BitFrame::parse(&flip(&friday_frame(), 18)).unwrap();
        assert_eq!(decode_frame(&frame), Err(FrameError::UtcOffsetConflict));
    }

    #[test]
    fn test_bcd_units_digit_overflow() {
        // minute 0 in the base frame; force the units digit to 10 by
        // setting the 2- and 8-weight bits (parity stays even)
        let base = build_frame(0, 12, 7, 5, 3, 25, false);
        let text = flip(&flip(&base, 22), 24);
        let frame = BitFrame::parse(&text).unwrap();
        assert_eq!(
            decode_frame(&frame),
            Err(FrameError::FieldRange {
                field: "minute",
                value: 10
            })
        );
    }

    #[test]
    fn test_weekday_cross_check() {
        // claim Thursday for a date that is a Friday
        let text = build_frame(34, 12, 7, 4, 3, 25, false);
        let frame = BitFrame::parse(&text).unwrap();
        assert_eq!(
            decode_frame(&frame),
            Err(FrameError::WeekdayMismatch {
                transmitted: 4,
                computed: 5
            })
        );
    }

    #[test]
    fn test_nonexistent_date_rejected() {
        // 2025-02-30, weekday irrelevant but parity-correct
        let text = build_frame(0, 0, 30, 7, 2, 25, false);
        let frame = BitFrame::parse(&text).unwrap();
        assert_eq!(
            decode_frame(&frame),
            Err(FrameError::FieldRange {
                field: "day-of-month",
                value: 30
            })
        );
    }

    #[test]
    fn test_century_leap_day_frame() {
        // 2000-02-29 was a Tuesday; 00:00 CET is 23:00 UTC the day before
        let text = build_frame(0, 0, 29, 2, 2, 0, false);
        let frame = BitFrame::parse(&text).unwrap();
        assert_eq!(decode_frame(&frame).unwrap(), 951_782_400 - 3600);
    }
}
