//! Shared fixture helpers for integration tests.
//!
//! Fixtures are encoded by hand, independently of the crate's header codec,
//! so the tests also exercise the binary layout itself.

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::Path;

use reframe::{HEADER_SIZE, SequenceHeader};

/// Encode a sequence file byte-for-byte: 11-byte little-endian header
/// followed by the given frames.
pub fn sequence_bytes(channels: u8, height: u8, width: u8, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(frames.len() as i64).to_le_bytes());
    bytes.push(channels);
    bytes.push(height);
    bytes.push(width);
    for frame in frames {
        bytes.extend_from_slice(frame);
    }
    bytes
}

/// Write an encoded sequence file to `path`.
pub fn write_sequence(path: &Path, channels: u8, height: u8, width: u8, frames: &[Vec<u8>]) {
    fs::write(path, sequence_bytes(channels, height, width, frames))
        .expect("failed to write fixture");
}

/// Read back a written sequence file, split into header and frames.
pub fn read_sequence(path: &Path) -> (SequenceHeader, Vec<Vec<u8>>) {
    let bytes = fs::read(path).expect("failed to read output");
    assert!(
        bytes.len() >= HEADER_SIZE,
        "output shorter than a header: {} bytes",
        bytes.len()
    );
    let header = SequenceHeader::read_from(&mut Cursor::new(&bytes)).expect("undecodable header");
    let frame_size = header.frame_size();
    let payload = &bytes[HEADER_SIZE..];
    assert_eq!(
        payload.len(),
        header.payload_size(),
        "payload length disagrees with header"
    );
    let frames = if frame_size == 0 {
        Vec::new()
    } else {
        payload.chunks(frame_size).map(<[u8]>::to_vec).collect()
    };
    (header, frames)
}

/// Deterministic frame content: every byte depends on frame and byte index.
pub fn patterned_frames(count: usize, frame_size: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|frame| {
            (0..frame_size)
                .map(|byte| ((frame * 31 + byte * 7) % 256) as u8)
                .collect()
        })
        .collect()
}
