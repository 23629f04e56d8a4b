//! Protocol Module
//!
//! Defines the wire protocol between host and device.
//!
//! ## Frame Format
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │   COBS(packet) (no 0x00)     │ 0x00 │
//! └──────────────────────────────┴──────┘
//! ```
//!
//! ### Request Packet
//! ```text
//! ┌──────────┬──────────┬──────────────┬──────────────┬───────────┐
//! │ Cmd (1)  │ Len (2)  │ Params (Len) │  Binary (*)  │ CRC32 (4) │
//! └──────────┴──────────┴──────────────┴──────────────┴───────────┘
//! ```
//!
//! ### Commands
//! - 0x11: CD   - Params: {"path":"..."}
//! - 0x12: LS   - Params: {"path":"..."} (optional)
//! - 0x13: RM   - Params: {"path":"..."}
//! - 0x21: GET  - Params: {"path":"...","off":N}
//! - 0x22: PUT  - Params: {"path":"...","off":N} + binary
//!
//! ### Response Packet
//! ```text
//! ┌──────────┬──────────┬──────────────┬──────────────┬───────────┐
//! │ 0x00 (1) │ Len (2)  │  JSON (Len)  │  Binary (*)  │ CRC32 (4) │
//! └──────────┴──────────┴──────────────┴──────────────┴───────────┘
//! ```
//!
//! Lengths and CRC are big-endian; the CRC covers every preceding byte.

mod command;
mod response;
mod codec;

pub mod cobs;
pub mod checksum;
pub mod params;

pub use command::{CommandType, Request};
pub use response::{Failure, Response, RESPONSE_CODE};
pub use checksum::CHECKSUM_SIZE;
pub use codec::{
    decode_frame, decode_request, decode_response, encode_frame, encode_request,
    encode_response, HEADER_SIZE, MIN_PACKET_SIZE,
};
