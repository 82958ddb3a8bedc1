//! Error types for the lockward trust engine

use thiserror::Error;

/// Main error type for lockward
#[derive(Error, Debug)]
pub enum LockwardError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar arithmetic errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Transport codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Radio frame decoding errors
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Token verification errors
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// System I/O errors
    #[error("System error: {0}")]
    System(#[from] std::io::Error),
}

/// Configuration parsing errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid config format at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Invalid base64 key: {field}")]
    InvalidKey { field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Calendar construction and conversion errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: u32, month: u8, day: u8 },

    #[error("Invalid time of day: {seconds} (expected 0..=86399)")]
    InvalidTimeOfDay { seconds: u32 },
}

/// Transport codec errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed encoding at byte {position}")]
    MalformedEncoding { position: usize },
}

/// Radio frame decoding errors
///
/// All of these are expected in normal operation (signal noise). The frame
/// is dropped and the previously decoded time is retained unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("Wrong bit count: {got} (expected 59 or 60)")]
    WrongBitCount { got: usize },

    #[error("Sample at position {position} is not 0 or 1")]
    InvalidSample { position: usize },

    #[error("Marker bit {bit} has wrong value")]
    MarkerMismatch { bit: u8 },

    #[error("Parity failure in {group} group")]
    ParityFailure { group: FieldGroup },

    #[error("Field {field} out of range: {value}")]
    FieldRange { field: &'static str, value: u8 },

    #[error("CET/CEST flags conflict")]
    UtcOffsetConflict,

    #[error("Transmitted weekday {transmitted} does not match calendar weekday {computed}")]
    WeekdayMismatch { transmitted: u8, computed: u8 },
}

/// Parity-protected field groups of a radio frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Minute,
    Hour,
    Date,
}

impl std::fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minute => write!(f, "minute"),
            Self::Hour => write!(f, "hour"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// Token verification errors
///
/// Terminal for the single verification attempt, never retried. Only the
/// bare reject decision crosses the unlock-actuation boundary; the specific
/// kind stays in internal logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token too short: {got} bytes (minimum {minimum})")]
    Malformed { got: usize, minimum: usize },

    #[error("Authentication tag mismatch")]
    BadSignature,

    #[error("Token expired: valid until {valid_until}, current time {current}")]
    Expired { valid_until: u64, current: u64 },

    #[error("Token not yet valid: valid from {valid_from}, current time {current}")]
    NotYetValid { valid_from: u64, current: u64 },
}

impl LockwardError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Calendar(_) => 2,
            Self::Codec(_) => 3,
            Self::Frame(_) => 4,
            Self::Token(_) => 5,
            Self::System(_) => 7,
        }
    }
}

/// Result type alias for lockward operations
pub type Result<T> = std::result::Result<T, LockwardError>;
