//! CRC-32 integrity check
//!
//! Reflected polynomial 0xEDB88320, init 0xFFFFFFFF, final XOR 0xFFFFFFFF
//! (the zip/gzip variant). Stored big-endian at the end of every packet.

use bytes::BufMut;

use crate::error::{Result, UartFsError};

/// Size of the trailing checksum in bytes
pub const CHECKSUM_SIZE: usize = 4;

/// Compute the CRC-32 of `data`
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Append the big-endian CRC-32 of everything already in `buf`
pub fn append<B: BufMut + AsRef<[u8]>>(buf: &mut B) {
    let crc = crc32(buf.as_ref());
    buf.put_u32(crc);
}

/// Verify the trailing CRC of `packet` and return the checked body
///
/// `packet` must hold at least the checksum itself.
pub fn verify(packet: &[u8]) -> Result<&[u8]> {
    if packet.len() < CHECKSUM_SIZE {
        return Err(UartFsError::FrameTooShort(packet.len()));
    }

    let (body, trailer) = packet.split_at(packet.len() - CHECKSUM_SIZE);
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let actual = crc32(body);

    if expected != actual {
        return Err(UartFsError::CrcMismatch { expected, actual });
    }

    Ok(body)
}
