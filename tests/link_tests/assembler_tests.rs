//! Frame Assembler Tests
//!
//! Tests for splitting a byte stream on delimiters.

use uartfs::link::FrameAssembler;

// =============================================================================
// Helper Functions
// =============================================================================

/// Feed all bytes and collect the completed frames
fn feed(assembler: &mut FrameAssembler, bytes: &[u8]) -> Vec<Vec<u8>> {
    bytes
        .iter()
        .filter_map(|&b| assembler.push(b))
        .map(|frame| frame.to_vec())
        .collect()
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_single_frame() {
    let mut assembler = FrameAssembler::new(64);
    let frames = feed(&mut assembler, &[0x03, 0x11, 0x22, 0x00]);

    assert_eq!(frames, vec![vec![0x03, 0x11, 0x22]]);
    assert_eq!(assembler.buffered_len(), 0);
}

#[test]
fn test_multiple_frames() {
    let mut assembler = FrameAssembler::new(64);
    let frames = feed(&mut assembler, &[0x01, 0x00, 0x02, 0x05, 0x00, 0x09, 0x00]);

    assert_eq!(frames, vec![vec![0x01], vec![0x02, 0x05], vec![0x09]]);
}

#[test]
fn test_leading_and_repeated_delimiters_ignored() {
    let mut assembler = FrameAssembler::new(64);
    let frames = feed(&mut assembler, &[0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x08, 0x00]);

    assert_eq!(frames, vec![vec![0x07], vec![0x08]]);
}

#[test]
fn test_partial_frame_stays_buffered() {
    let mut assembler = FrameAssembler::new(64);
    let frames = feed(&mut assembler, &[0x04, 0x01, 0x02]);

    assert!(frames.is_empty());
    assert_eq!(assembler.buffered_len(), 3);

    assembler.clear();
    assert_eq!(assembler.buffered_len(), 0);
}

// =============================================================================
// Overflow Tests
// =============================================================================

#[test]
fn test_frame_at_capacity() {
    let mut assembler = FrameAssembler::new(4);
    let frames = feed(&mut assembler, &[1, 2, 3, 4, 0]);

    assert_eq!(frames, vec![vec![1, 2, 3, 4]]);
    assert_eq!(assembler.overflow_count(), 0);
}

#[test]
fn test_overflow_discards_partial_frame() {
    let mut assembler = FrameAssembler::new(4);
    let frames = feed(&mut assembler, &[1, 2, 3, 4, 5]);

    assert!(frames.is_empty());
    assert_eq!(assembler.buffered_len(), 0);
    assert_eq!(assembler.overflow_count(), 1);
}

#[test]
fn test_recovers_after_overflow() {
    let mut assembler = FrameAssembler::new(4);
    let frames = feed(&mut assembler, &[1, 2, 3, 4, 5, 7, 8, 0, 9, 0]);

    assert_eq!(frames, vec![vec![7, 8], vec![9]]);
    assert_eq!(assembler.overflow_count(), 1);
}
