//! Protocol codec
//!
//! Encoding and decoding of packets and frames.
//!
//! ## Packet Layout
//! ```text
//! ┌──────────┬──────────┬──────────────┬──────────────┬───────────┐
//! │ Code (1) │ Len (2)  │  Text (Len)  │  Binary (*)  │ CRC32 (4) │
//! └──────────┴──────────┴──────────────┴──────────────┴───────────┘
//! ```
//!
//! Validation order on decode: minimum size, CRC, declared length.

use bytes::{BufMut, BytesMut};

use crate::error::{Result, UartFsError};
use super::checksum::{self, CHECKSUM_SIZE};
use super::cobs::{self, DELIMITER};
use super::{Request, Response, RESPONSE_CODE};

/// Header size: 1 byte code + 2 bytes text length
pub const HEADER_SIZE: usize = 3;

/// Smallest valid packet: header + empty text + checksum
pub const MIN_PACKET_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

// =============================================================================
// Packet Assembly
// =============================================================================

/// Build `code | len | text | binary | crc`
fn build_packet(code: u8, text: &[u8], binary: &[u8]) -> Result<Vec<u8>> {
    if text.len() > u16::MAX as usize {
        return Err(UartFsError::Protocol(format!(
            "Text too long for 16-bit length field: {} bytes",
            text.len()
        )));
    }

    let mut packet =
        BytesMut::with_capacity(HEADER_SIZE + text.len() + binary.len() + CHECKSUM_SIZE);
    packet.put_u8(code);
    packet.put_u16(text.len() as u16);
    packet.put_slice(text);
    packet.put_slice(binary);
    checksum::append(&mut packet);

    Ok(packet.to_vec())
}

/// Validate a packet and split it into `(code, text, binary)`
fn split_packet(packet: &[u8]) -> Result<(u8, &[u8], &[u8])> {
    if packet.len() < MIN_PACKET_SIZE {
        return Err(UartFsError::FrameTooShort(packet.len()));
    }

    let body = checksum::verify(packet)?;

    let code = body[0];
    let text_len = u16::from_be_bytes([body[1], body[2]]) as usize;
    let available = body.len() - HEADER_SIZE;

    if text_len > available {
        return Err(UartFsError::InvalidLength {
            declared: text_len,
            available,
        });
    }

    let text = &body[HEADER_SIZE..HEADER_SIZE + text_len];
    let binary = &body[HEADER_SIZE + text_len..];

    Ok((code, text, binary))
}

/// Text up to the first NUL, which must be valid UTF-8
fn text_until_nul(text: &[u8]) -> Result<String> {
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    std::str::from_utf8(&text[..end])
        .map(str::to_owned)
        .map_err(|e| UartFsError::MalformedParams(format!("invalid UTF-8: {}", e)))
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to a packet (CRC included, not yet COBS encoded)
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    build_packet(request.code, request.params.as_bytes(), &request.binary)
}

/// Decode a request packet
///
/// `max_params` counts the terminator slot of the device's buffer, so text
/// of `max_params` bytes or more is rejected. Text that is not UTF-8 is
/// `MalformedParams`.
pub fn decode_request(packet: &[u8], max_params: usize) -> Result<Request> {
    let (code, text, binary) = split_packet(packet)?;

    if text.len() >= max_params {
        return Err(UartFsError::ParamsTooLong {
            len: text.len(),
            max: max_params.saturating_sub(1),
        });
    }

    Ok(Request {
        code,
        params: text_until_nul(text)?,
        binary: binary.to_vec(),
    })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to a packet (CRC included, not yet COBS encoded)
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    build_packet(RESPONSE_CODE, response.json.as_bytes(), &response.binary)
}

/// Decode a response packet
pub fn decode_response(packet: &[u8]) -> Result<Response> {
    let (code, text, binary) = split_packet(packet)?;

    if code != RESPONSE_CODE {
        return Err(UartFsError::Protocol(format!(
            "Unexpected response code: 0x{:02x}",
            code
        )));
    }

    Ok(Response {
        json: String::from_utf8_lossy(text).into_owned(),
        binary: binary.to_vec(),
    })
}

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// COBS encode a packet and append the delimiter
///
/// The encoded bytes (delimiter excluded) must fit `max_frame_size`.
pub fn encode_frame(packet: &[u8], max_frame_size: usize) -> Result<Vec<u8>> {
    let mut frame = cobs::encode(packet, max_frame_size)?;
    frame.push(DELIMITER);
    Ok(frame)
}

/// COBS decode a frame received without its delimiter
pub fn decode_frame(frame: &[u8], max_frame_size: usize) -> Result<Vec<u8>> {
    cobs::decode(frame, max_frame_size)
}
