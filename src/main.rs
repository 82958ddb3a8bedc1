//! Lockward CLI - door lock trust engine console
//!
//! Runs the trust engine against line-oriented input, the same protocol
//! the serial bridge speaks: a line of 59-60 `0`/`1` characters is a
//! sampled radio bitframe, anything else is a transport-encoded token.
//! Each token line is answered with `grant <identity>` or `deny`.

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use lockward::{AccessDecision, LockConfig, LockwardError, TrustEngine};

/// Lockward - door lock trust engine
#[derive(Parser, Debug)]
#[command(name = "lockward")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the device configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: Args) -> Result<(), LockwardError> {
    tracing::info!("Loading configuration from: {}", args.config.display());
    let config = LockConfig::from_file(&args.config)?;

    let mut engine = TrustEngine::new(config);
    let boot = Instant::now();

    tracing::info!("Lockward trust engine starting...");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let monotonic_now = boot.elapsed().as_secs();

        if is_bitframe(line) {
            engine.observe_frame(line, monotonic_now);
            continue;
        }

        match engine.authorize(line, monotonic_now) {
            AccessDecision::Granted { identity, .. } => println!("grant {}", identity),
            AccessDecision::Denied => println!("deny"),
        }
    }

    Ok(())
}

/// A radio frame line: nothing but `0`/`1`, one character per sampled
/// second of a minute
fn is_bitframe(line: &str) -> bool {
    (59..=60).contains(&line.len()) && line.bytes().all(|b| b == b'0' || b == b'1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitframe_classification() {
        let frame = "0".repeat(59);
        assert!(is_bitframe(&frame));
        assert!(is_bitframe(&format!("{frame}1")));
        assert!(!is_bitframe(&"0".repeat(58)));
        assert!(!is_bitframe(&"0".repeat(61)));
        // transport-encoded tokens contain characters outside 0/1
        assert!(!is_bitframe("4p86qUC0a3NCdFlvRthFWQAAAABeDa"));
    }
}
