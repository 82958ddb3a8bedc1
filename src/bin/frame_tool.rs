//! Conformance tool: radio frame decoding
//!
//! Reads one bitframe string per line (spaces allowed between samples)
//! and writes the decoded Unix timestamp per line, `fail` for frames
//! that are rejected.

use std::io::BufRead;

use lockward::radio::{decode_frame, BitFrame};

fn main() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let samples: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if samples.is_empty() {
            continue;
        }

        match BitFrame::parse(&samples).and_then(|frame| decode_frame(&frame)) {
            Ok(timestamp) => println!("{}", timestamp),
            Err(_) => println!("fail"),
        }
    }
    Ok(())
}
