//! Conformance tool: transport codec
//!
//! Encodes raw stdin bytes to transport text, or with `--decode` turns
//! transport text back into raw bytes on stdout.

use std::io::{Read, Write};

use clap::Parser;

use lockward::codec;

#[derive(Parser, Debug)]
#[command(name = "codec_tool")]
struct Args {
    /// Decode transport text instead of encoding bytes
    #[arg(long)]
    decode: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;

    if args.decode {
        let text = String::from_utf8(input)?;
        let bytes = codec::decode(text.trim_end())?;
        std::io::stdout().write_all(&bytes)?;
    } else {
        println!("{}", codec::encode(&input));
    }
    Ok(())
}
