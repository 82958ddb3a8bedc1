//! Conformance tool: digest of stdin
//!
//! Reads raw bytes from stdin and writes the lowercase hex SHA-256
//! digest, directly comparable against any standard implementation.

use std::io::Read;

use lockward::crypto;

fn main() -> anyhow::Result<()> {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data)?;
    println!("{}", hex::encode(crypto::digest(&data)));
    Ok(())
}
