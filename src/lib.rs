//! # uartfs
//!
//! Remote filesystem access over a single serial link:
//! - COBS framing with `0x00` as the frame delimiter
//! - CRC-32 checked request/response packets
//! - Flat JSON-like parameter text
//! - Five commands: cd, ls, rm, get, put (chunked, offset addressed)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Serial Link                             │
//! │              (timed byte reads, buffer writes)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Frame Assembler                             │
//! │            (split on 0x00, capped buffer)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │        COBS decode → CRC verify → packet parse               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Engine / Dispatcher                          │
//! │       (session lock, parameter extraction, handlers)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                ┌─────────────┐
//!                │ FileSystem  │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod vfs;
pub mod link;
pub mod engine;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{UartFsError, Result};
pub use config::Config;
pub use engine::Engine;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of uartfs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
