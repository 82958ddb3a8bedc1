//! Proleptic Gregorian calendar arithmetic
//!
//! Converts between calendar dates and Unix timestamps without any time
//! library, clock, or lookup table beyond the month lengths. All seconds
//! arithmetic is 64-bit; the conversions are exact across century leap-year
//! boundaries (1900, 2000, 2100, 2400) and through year 9999.

use crate::error::CalendarError;

/// Seconds in a complete day
pub const SECONDS_PER_DAY: i64 = 86_400;

// In 400 years there are 146097 days.
const DAYS_PER_400_YEARS: i64 = 146_097;

// Complete days between 0000-01-01 and 1970-01-01.
const DAYS_TO_UNIX_EPOCH: i64 = 719_528;

/// A validated Gregorian calendar date
///
/// `year` counts from year 0 of the proleptic Gregorian calendar; `month`
/// and `day` count from 1. Construction through [`CalendarDate::new`]
/// guarantees the day exists in that month for that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    year: u32,
    month: u8,
    day: u8,
}

/// A year is a leap year iff it is divisible by 4 and either not divisible
/// by 100 or divisible by 400.
pub fn is_leap_year(year: u32) -> bool {
    if year % 4 == 0 {
        if year % 100 == 0 {
            year % 400 == 0
        } else {
            true
        }
    } else {
        false
    }
}

/// Number of days in the given month of the given year
pub fn month_length(year: u32, month: u8) -> u8 {
    match month {
        1 => 31,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 => 31,
        4 => 30,
        5 => 31,
        6 => 30,
        7 => 31,
        8 => 31,
        9 => 30,
        10 => 31,
        11 => 30,
        12 => 31,
        _ => 0,
    }
}

// Complete days between January 1st and the first of the given month.
fn days_before_month(year: u32, month: u8) -> u32 {
    let leap = is_leap_year(year);
    match month {
        1 => 0,
        2 => 31,
        3 => {
            if leap {
                60
            } else {
                59
            }
        }
        4 => {
            if leap {
                91
            } else {
                90
            }
        }
        5 => {
            if leap {
                121
            } else {
                120
            }
        }
        6 => {
            if leap {
                152
            } else {
                151
            }
        }
        7 => {
            if leap {
                182
            } else {
                181
            }
        }
        8 => {
            if leap {
                213
            } else {
                212
            }
        }
        9 => {
            if leap {
                244
            } else {
                243
            }
        }
        10 => {
            if leap {
                274
            } else {
                273
            }
        }
        11 => {
            if leap {
                305
            } else {
                304
            }
        }
        12 => {
            if leap {
                335
            } else {
                334
            }
        }
        _ => 0,
    }
}

// Complete days between 0000-01-01 and January 1st of the given year.
// The leap count sums one day per completed 4-year cycle, minus one per
// completed century, plus one per completed 400-year cycle; year 0 itself
// is a leap year.
fn days_before_year(year: i64) -> i64 {
    let leap_days = (year + 3) / 4 - (year + 99) / 100 + (year + 399) / 400;
    365 * year + leap_days
}

fn year_length(year: i64) -> i64 {
    if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
        366
    } else {
        365
    }
}

impl CalendarDate {
    /// Construct a validated date
    pub fn new(year: u32, month: u8, day: u8) -> Result<Self, CalendarError> {
        if month < 1 || month > 12 || day < 1 || day > month_length(year, month) {
            return Err(CalendarError::InvalidDate { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Day within the year, counting from 1
    pub fn day_of_year(&self) -> u32 {
        days_before_month(self.year, self.month) + self.day as u32
    }

    /// ISO day of week: 1 = Monday .. 7 = Sunday
    ///
    /// Anchored so that 1970-01-01 is Thursday (4).
    pub fn day_of_week(&self) -> u8 {
        ((self.days_since_unix_epoch() + 3).rem_euclid(7) + 1) as u8
    }

    // Complete days between 1970-01-01 and the start of this day.
    // Negative for dates before the epoch.
    fn days_since_unix_epoch(&self) -> i64 {
        days_before_year(self.year as i64) + (self.day_of_year() as i64 - 1)
            - DAYS_TO_UNIX_EPOCH
    }

    /// Unix timestamp of this date at the given second of the day
    pub fn to_timestamp(&self, time_of_day: u32) -> Result<i64, CalendarError> {
        if time_of_day >= SECONDS_PER_DAY as u32 {
            return Err(CalendarError::InvalidTimeOfDay {
                seconds: time_of_day,
            });
        }
        Ok(self.days_since_unix_epoch() * SECONDS_PER_DAY + time_of_day as i64)
    }

    /// Inverse of [`CalendarDate::to_timestamp`]: date and second-of-day
    /// for a Unix timestamp
    ///
    /// Defined for timestamps that fall in years 0..=9999.
    pub fn from_timestamp(timestamp: i64) -> (Self, u32) {
        let days = timestamp.div_euclid(SECONDS_PER_DAY);
        let time_of_day = timestamp.rem_euclid(SECONDS_PER_DAY) as u32;

        let days = days + DAYS_TO_UNIX_EPOCH;
        debug_assert!(days >= 0, "timestamp before year 0");

        let era = days.div_euclid(DAYS_PER_400_YEARS);
        let mut remaining = days.rem_euclid(DAYS_PER_400_YEARS);
        let mut year = era * 400;
        loop {
            let length = year_length(year);
            if remaining < length {
                break;
            }
            remaining -= length;
            year += 1;
        }

        let year = year as u32;
        let mut month = 1u8;
        loop {
            let length = month_length(year, month) as i64;
            if remaining < length {
                break;
            }
            remaining -= length;
            month += 1;
        }

        let date = Self {
            year,
            month,
            day: remaining as u8 + 1,
        };
        (date, time_of_day)
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
