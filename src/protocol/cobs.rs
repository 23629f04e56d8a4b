//! Consistent Overhead Byte Stuffing
//!
//! Removes every `0x00` from a packet so that `0x00` can delimit frames.
//!
//! ## Encoding
//! ```text
//! input:  11 22 00 33
//! output: 03 11 22 02 33
//!         ^code       ^code (run length + 1, implied zero after)
//! ```
//! A code of `0xFF` marks a full 254-byte run with no implied zero.

use crate::error::{Result, UartFsError};

/// Frame delimiter on the wire
pub const DELIMITER: u8 = 0x00;

/// Code for a maximal run (254 data bytes, no implied zero)
const MAX_RUN_CODE: u8 = 0xFF;

/// Worst-case encoded length for `len` input bytes
pub fn max_encoded_len(len: usize) -> usize {
    len + 1 + len / 254
}

/// Encode `input` so the result contains no `0x00`
///
/// Fails with `FrameTooLarge` when the input plus two bytes, or the encoded
/// result, would not fit in `capacity`.
pub fn encode(input: &[u8], capacity: usize) -> Result<Vec<u8>> {
    if input.len() + 2 > capacity {
        return Err(UartFsError::FrameTooLarge {
            len: input.len() + 2,
            max: capacity,
        });
    }

    let mut output = Vec::with_capacity(max_encoded_len(input.len()));
    let mut code_idx = 0;
    let mut code: u8 = 1;
    output.push(0); // Placeholder for the first code

    for &byte in input {
        if byte == 0 {
            output[code_idx] = code;
            code_idx = output.len();
            output.push(0);
            code = 1;
        } else {
            output.push(byte);
            code += 1;
            if code == MAX_RUN_CODE {
                output[code_idx] = code;
                code_idx = output.len();
                output.push(0);
                code = 1;
            }
        }
    }
    output[code_idx] = code;

    if output.len() > capacity {
        return Err(UartFsError::FrameTooLarge {
            len: output.len(),
            max: capacity,
        });
    }

    Ok(output)
}

/// Decode a COBS frame (without its delimiter)
///
/// A zero code byte or a block running past the end of the input is a
/// malformed frame. Output beyond `capacity` is `FrameTooLarge`.
pub fn decode(input: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len().min(capacity));
    let mut pos = 0;

    while pos < input.len() {
        let code = input[pos];
        if code == 0 {
            return Err(UartFsError::MalformedFrame(format!(
                "zero code byte at offset {}",
                pos
            )));
        }
        pos += 1;

        let run = code as usize - 1;
        if pos + run > input.len() {
            return Err(UartFsError::MalformedFrame(format!(
                "block at offset {} needs {} bytes, {} left",
                pos - 1,
                run,
                input.len() - pos
            )));
        }

        let implied_zero = code != MAX_RUN_CODE && pos + run < input.len();
        let needed = output.len() + run + usize::from(implied_zero);
        if needed > capacity {
            return Err(UartFsError::FrameTooLarge {
                len: needed,
                max: capacity,
            });
        }

        output.extend_from_slice(&input[pos..pos + run]);
        pos += run;

        if implied_zero {
            output.push(0);
        }
    }

    Ok(output)
}
