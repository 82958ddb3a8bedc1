//! Lockward - radio-clock-synchronized door lock trust engine
//!
//! The firmware-side core of a token-operated lock. It keeps wall-clock
//! time from a long-wave radio time signal (no network, no battery-backed
//! clock), implements the digest and transport-codec primitives needed to
//! check capability tokens, and decides whether a presented token
//! authorizes unlocking at the current moment.
//!
//! # Features
//!
//! - Proleptic Gregorian calendar arithmetic, exact across century
//!   leap-year boundaries and through year 9999
//! - Per-minute radio bitframe decoding with parity validation
//! - Self-contained SHA-256, byte-identical to the standard construction
//! - Strict base64 transport codec
//! - Constant-time token verification with a pluggable signed-payload
//!   contract
//!
//! # Usage
//!
//! ```no_run
//! use lockward::{LockConfig, TrustEngine};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LockConfig::from_file("lockward.conf")?;
//!     let mut engine = TrustEngine::new(config);
//!
//!     engine.observe_frame("00101000110...", 30);
//!     let decision = engine.authorize("4p86qUC0a3...", 45);
//!     println!("{:?}", decision);
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod radio;
pub mod token;

pub use config::LockConfig;
pub use engine::{AccessDecision, TrustEngine};
pub use error::LockwardError;
