//! Text transport codec
//!
//! Tokens travel to the lock inside a QR payload or over a serial line, so
//! the binary blob is transcoded to text: 4 characters per 3 bytes using
//! the standard 64-character alphabet, `=` padding for a final partial
//! group. The decoder is strict; any deviation from canonical form is a
//! corrupt external input and rejected outright.

use crate::error::CodecError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PAD: u8 = b'=';

fn sextet(character: u8) -> Option<u8> {
    match character {
        b'A'..=b'Z' => Some(character - b'A'),
        b'a'..=b'z' => Some(26 + character - b'a'),
        b'0'..=b'9' => Some(52 + character - b'0'),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Encode bytes as transport text
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);

    let mut chunks = data.chunks_exact(3);
    for chunk in &mut chunks {
        let word =
            (chunk[0] as u32) << 16 | (chunk[1] as u32) << 8 | chunk[2] as u32;
        for shift in [18, 12, 6, 0] {
            out.push(ALPHABET[(word >> shift) as usize & 0x3f] as char);
        }
    }

    match chunks.remainder() {
        [] => {}
        [a] => {
            let word = (*a as u32) << 16;
            out.push(ALPHABET[(word >> 18) as usize & 0x3f] as char);
            out.push(ALPHABET[(word >> 12) as usize & 0x3f] as char);
            out.push(PAD as char);
            out.push(PAD as char);
        }
        [a, b] => {
            let word = (*a as u32) << 16 | (*b as u32) << 8;
            out.push(ALPHABET[(word >> 18) as usize & 0x3f] as char);
            out.push(ALPHABET[(word >> 12) as usize & 0x3f] as char);
            out.push(ALPHABET[(word >> 6) as usize & 0x3f] as char);
            out.push(PAD as char);
        }
        _ => unreachable!("chunks_exact(3) remainder is at most 2 bytes"),
    }

    out
}

/// Decode transport text back to bytes
///
/// Fails with [`CodecError::MalformedEncoding`] on characters outside the
/// alphabet, padding anywhere but the end of the final group, or input
/// whose length is not a multiple of 4.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let bytes = text.as_bytes();
    if bytes.len() % 4 != 0 {
        return Err(CodecError::MalformedEncoding {
            position: bytes.len(),
        });
    }

    let mut out = Vec::with_capacity(bytes.len() / 4 * 3);

    for (group_index, group) in bytes.chunks_exact(4).enumerate() {
        let base = group_index * 4;
        let last_group = base + 4 == bytes.len();

        // '=' is only allowed as padding in the last one or two characters
        // of the final group.
        let padding = if group[3] == PAD {
            if group[2] == PAD {
                2
            } else {
                1
            }
        } else {
            0
        };
        if padding > 0 && !last_group {
            return Err(CodecError::MalformedEncoding {
                position: base + 4 - padding,
            });
        }

        let mut word = 0u32;
        for (i, &character) in group.iter().enumerate() {
            let value = if i >= 4 - padding {
                0
            } else {
                sextet(character).ok_or(CodecError::MalformedEncoding {
                    position: base + i,
                })?
            };
            word = word << 6 | value as u32;
        }

        out.push((word >> 16) as u8);
        if padding < 2 {
            out.push((word >> 8) as u8);
        }
        if padding < 1 {
            out.push(word as u8);
        }
    }

    Ok(out)
}
