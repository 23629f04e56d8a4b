//! COBS Tests
//!
//! Tests for escape-free encoding and decoding.

use uartfs::protocol::cobs::{decode, encode, max_encoded_len};
use uartfs::UartFsError;

/// Generous capacity for tests that are not about limits
const BIG: usize = 64 * 1024;

// =============================================================================
// Helper Functions
// =============================================================================

/// Deterministic byte pattern with plenty of zeros
fn mixed_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let b = (state >> 16) as u8;
            if b % 5 == 0 {
                0
            } else {
                b
            }
        })
        .collect()
}

fn assert_round_trip(input: &[u8]) {
    let encoded = encode(input, BIG).unwrap();
    assert!(
        !encoded.contains(&0),
        "encoded output contains a zero for input of {} bytes",
        input.len()
    );
    assert!(encoded.len() <= max_encoded_len(input.len()));
    let decoded = decode(&encoded, BIG).unwrap();
    assert_eq!(decoded, input);
}

// =============================================================================
// Known Vectors
// =============================================================================

#[test]
fn test_encode_empty() {
    assert_eq!(encode(&[], BIG).unwrap(), vec![0x01]);
}

#[test]
fn test_encode_single_zero() {
    assert_eq!(encode(&[0x00], BIG).unwrap(), vec![0x01, 0x01]);
}

#[test]
fn test_encode_two_zeros() {
    assert_eq!(encode(&[0x00, 0x00], BIG).unwrap(), vec![0x01, 0x01, 0x01]);
}

#[test]
fn test_encode_zero_surrounded() {
    assert_eq!(
        encode(&[0x00, 0x11, 0x00], BIG).unwrap(),
        vec![0x01, 0x02, 0x11, 0x01]
    );
}

#[test]
fn test_encode_zero_in_middle() {
    assert_eq!(
        encode(&[0x11, 0x22, 0x00, 0x33], BIG).unwrap(),
        vec![0x03, 0x11, 0x22, 0x02, 0x33]
    );
}

#[test]
fn test_encode_no_zeros() {
    assert_eq!(
        encode(&[0x11, 0x22, 0x33, 0x44], BIG).unwrap(),
        vec![0x05, 0x11, 0x22, 0x33, 0x44]
    );
}

#[test]
fn test_encode_trailing_zeros() {
    assert_eq!(
        encode(&[0x11, 0x00, 0x00, 0x00], BIG).unwrap(),
        vec![0x02, 0x11, 0x01, 0x01, 0x01]
    );
}

#[test]
fn test_encode_full_run() {
    // 254 non-zero bytes fill one block; a final empty block follows
    let input: Vec<u8> = (1..=254).collect();
    let encoded = encode(&input, BIG).unwrap();

    assert_eq!(encoded.len(), 256);
    assert_eq!(encoded[0], 0xFF);
    assert_eq!(&encoded[1..255], &input[..]);
    assert_eq!(encoded[255], 0x01);
    assert_eq!(decode(&encoded, BIG).unwrap(), input);
}

#[test]
fn test_encode_run_longer_than_block() {
    let input: Vec<u8> = (0..300).map(|i| (i % 255 + 1) as u8).collect();
    let encoded = encode(&input, BIG).unwrap();

    assert_eq!(encoded[0], 0xFF);
    assert_eq!(encoded[255], 47); // 46 remaining bytes + 1
    assert_eq!(decode(&encoded, BIG).unwrap(), input);
}

#[test]
fn test_decode_known_vector() {
    let decoded = decode(&[0x03, 0x11, 0x22, 0x02, 0x33], BIG).unwrap();
    assert_eq!(decoded, vec![0x11, 0x22, 0x00, 0x33]);
}

#[test]
fn test_decode_empty() {
    assert!(decode(&[], BIG).unwrap().is_empty());
}

// =============================================================================
// Round-Trip Property
// =============================================================================

#[test]
fn test_round_trip_all_short_lengths() {
    for len in 0..=600 {
        assert_round_trip(&mixed_bytes(len, len as u32));
    }
}

#[test]
fn test_round_trip_all_zero_inputs() {
    for len in [1, 2, 253, 254, 255, 1000] {
        assert_round_trip(&vec![0u8; len]);
    }
}

#[test]
fn test_round_trip_no_zero_inputs() {
    for len in [1, 253, 254, 255, 508, 509, 2000] {
        assert_round_trip(&vec![0xAAu8; len]);
    }
}

#[test]
fn test_round_trip_every_byte_value() {
    let input: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
    assert_round_trip(&input);
}

#[test]
fn test_round_trip_max_frame_size() {
    assert_round_trip(&mixed_bytes(8192, 7));
    assert_round_trip(&vec![0x5Au8; 8192]);
}

// =============================================================================
// Capacity Tests
// =============================================================================

#[test]
fn test_encode_rejects_input_without_overhead_room() {
    let result = encode(&[0x01; 10], 11);
    assert!(matches!(
        result,
        Err(UartFsError::FrameTooLarge { len: 12, max: 11 })
    ));
}

#[test]
fn test_encode_fits_exactly() {
    let encoded = encode(&[0x01; 10], 12).unwrap();
    assert_eq!(encoded.len(), 11);
}

#[test]
fn test_encode_rejects_output_over_capacity() {
    // 600 non-zero bytes need 3 code bytes: 603 > 602
    let result = encode(&[0x01; 600], 602);
    assert!(matches!(result, Err(UartFsError::FrameTooLarge { .. })));
}

#[test]
fn test_decode_rejects_output_over_capacity() {
    let result = decode(&[0x05, 0x01, 0x02, 0x03, 0x04], 3);
    assert!(matches!(result, Err(UartFsError::FrameTooLarge { .. })));
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_zero_code_is_malformed() {
    let result = decode(&[0x02, 0x11, 0x00, 0x01], BIG);
    assert!(matches!(result, Err(UartFsError::MalformedFrame(_))));
}

#[test]
fn test_decode_leading_zero_is_malformed() {
    let result = decode(&[0x00], BIG);
    assert!(matches!(result, Err(UartFsError::MalformedFrame(_))));
}

#[test]
fn test_decode_truncated_block_is_malformed() {
    let result = decode(&[0x05, 0x11, 0x22], BIG);
    assert!(matches!(result, Err(UartFsError::MalformedFrame(_))));
    assert!(result.unwrap_err().to_string().contains("Malformed frame"));
}
