//! Checksum Tests
//!
//! Tests for the CRC-32 packet trailer.

use uartfs::protocol::checksum::{append, crc32, verify, CHECKSUM_SIZE};
use uartfs::UartFsError;

// =============================================================================
// Known Vectors
// =============================================================================

#[test]
fn test_crc32_check_value() {
    assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
}

#[test]
fn test_crc32_empty() {
    assert_eq!(crc32(b""), 0);
}

#[test]
fn test_crc32_sentence() {
    assert_eq!(
        crc32(b"The quick brown fox jumps over the lazy dog"),
        0x414F_A339
    );
}

#[test]
fn test_crc32_deterministic() {
    let data: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 251) as u8).collect();
    assert_eq!(crc32(&data), crc32(&data));
}

// =============================================================================
// Error Detection
// =============================================================================

#[test]
fn test_crc32_detects_every_single_bit_flip() {
    let original: Vec<u8> = b"{\"path\":\"/data/log.txt\",\"off\":4096}".to_vec();
    let crc = crc32(&original);

    for byte in 0..original.len() {
        for bit in 0..8 {
            let mut corrupted = original.clone();
            corrupted[byte] ^= 1 << bit;
            assert_ne!(crc32(&corrupted), crc, "flip at byte {} bit {}", byte, bit);
        }
    }
}

// =============================================================================
// Append/Verify
// =============================================================================

#[test]
fn test_append_writes_big_endian_trailer() {
    let mut packet = b"123456789".to_vec();
    append(&mut packet);

    assert_eq!(packet.len(), 9 + CHECKSUM_SIZE);
    assert_eq!(&packet[9..], &[0xCB, 0xF4, 0x39, 0x26]);
}

#[test]
fn test_verify_returns_body() {
    let mut packet = b"hello".to_vec();
    append(&mut packet);

    assert_eq!(verify(&packet).unwrap(), b"hello");
}

#[test]
fn test_verify_detects_corruption() {
    let mut packet = b"hello".to_vec();
    append(&mut packet);
    packet[1] ^= 0x20;

    let result = verify(&packet);
    assert!(matches!(result, Err(UartFsError::CrcMismatch { .. })));
}

#[test]
fn test_verify_detects_corrupted_trailer() {
    let mut packet = b"hello".to_vec();
    append(&mut packet);
    let last = packet.len() - 1;
    packet[last] ^= 0x01;

    assert!(matches!(
        verify(&packet),
        Err(UartFsError::CrcMismatch { .. })
    ));
}

#[test]
fn test_verify_rejects_short_input() {
    assert!(matches!(
        verify(&[0x01, 0x02, 0x03]),
        Err(UartFsError::FrameTooShort(3))
    ));
}

#[test]
fn test_verify_checksum_only() {
    // Empty body: CRC of nothing is zero
    assert_eq!(verify(&[0, 0, 0, 0]).unwrap(), b"");
}
