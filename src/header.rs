//! Sequence header codec.
//!
//! A raw sequence file starts with a fixed 11-byte header describing the
//! frame payload that follows:
//!
//! ```text
//! offset 0:  i64  frame_count   (little-endian)
//! offset 8:  u8   channels
//! offset 9:  u8   height
//! offset 10: u8   width
//! ```
//!
//! The header is packed — no padding is ever written, regardless of platform
//! alignment — so encoding goes through an explicit byte buffer rather than
//! any in-memory struct layout.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::FrameError;
use crate::store;

/// Size of the encoded sequence header in bytes.
pub const HEADER_SIZE: usize = 11;

/// The fixed-size header at the start of every sequence file.
///
/// Frame data follows immediately after the encoded header; frame `i` starts
/// at byte [`frame_offset(i)`](SequenceHeader::frame_offset). Transforms that
/// change the sequence shape (decimation, cropping) rewrite the header at
/// offset 0 before appending frame data; all other transforms copy it through
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceHeader {
    /// Number of frames in the payload. Non-negative for any valid file.
    pub frame_count: i64,
    /// Channel planes per frame.
    pub channels: u8,
    /// Rows per channel plane.
    pub height: u8,
    /// Columns per row.
    pub width: u8,
}

impl SequenceHeader {
    /// Decode a header from its 11-byte wire form.
    pub fn from_bytes(raw: &[u8; HEADER_SIZE]) -> Self {
        let mut count = [0_u8; 8];
        count.copy_from_slice(&raw[0..8]);
        Self {
            frame_count: i64::from_le_bytes(count),
            channels: raw[8],
            height: raw[9],
            width: raw[10],
        }
    }

    /// Encode the header into its 11-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut raw = [0_u8; HEADER_SIZE];
        raw[0..8].copy_from_slice(&self.frame_count.to_le_bytes());
        raw[8] = self.channels;
        raw[9] = self.height;
        raw[10] = self.width;
        raw
    }

    /// Read a header from the current position of `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShortRead`] if fewer than [`HEADER_SIZE`] bytes
    /// are available, with `actual` reporting how many were.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, FrameError> {
        let mut raw = [0_u8; HEADER_SIZE];
        store::read_exact_counted(reader, &mut raw)?;
        Ok(Self::from_bytes(&raw))
    }

    /// Write the encoded header at the current position of `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShortWrite`] if the writer accepts fewer than
    /// [`HEADER_SIZE`] bytes.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), FrameError> {
        store::write_exact_counted(writer, &self.to_bytes())
    }

    /// Seek `writer` to offset 0 and write the encoded header there.
    ///
    /// Used by transforms that change the sequence shape. Must be called
    /// before any frame data is appended, since frame data is written
    /// sequentially afterwards.
    pub fn rewrite_to<W: Write + Seek>(&self, writer: &mut W) -> Result<(), FrameError> {
        writer.seek(SeekFrom::Start(0))?;
        self.write_to(writer)
    }

    /// Bytes in one channel plane (`height * width`).
    pub fn plane_size(&self) -> usize {
        usize::from(self.height) * usize::from(self.width)
    }

    /// Bytes in one frame (`channels * height * width`).
    pub fn frame_size(&self) -> usize {
        self.plane_size() * usize::from(self.channels)
    }

    /// Bytes in the whole frame payload.
    pub fn payload_size(&self) -> usize {
        self.frame_size() * self.frame_count.max(0) as usize
    }

    /// Absolute byte offset of frame `index` within the file.
    pub fn frame_offset(&self, index: i64) -> u64 {
        HEADER_SIZE as u64 + index as u64 * self.frame_size() as u64
    }

    /// `true` when every frame carries at least one pixel, i.e. channels,
    /// height, and width are all non-zero.
    pub fn has_pixels(&self) -> bool {
        self.frame_size() > 0
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{HEADER_SIZE, SequenceHeader};
    use crate::error::FrameError;

    fn sample() -> SequenceHeader {
        SequenceHeader {
            frame_count: 300,
            channels: 3,
            height: 120,
            width: 160,
        }
    }

    #[test]
    fn wire_form_is_packed_little_endian() {
        let raw = sample().to_bytes();
        assert_eq!(raw.len(), HEADER_SIZE);
        assert_eq!(&raw[0..8], &300_i64.to_le_bytes());
        assert_eq!(raw[8], 3);
        assert_eq!(raw[9], 120);
        assert_eq!(raw[10], 160);
    }

    #[test]
    fn round_trip() {
        let header = sample();
        let mut encoded = Vec::new();
        header.write_to(&mut encoded).unwrap();
        let decoded = SequenceHeader::read_from(&mut Cursor::new(encoded)).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn truncated_header_is_a_short_read() {
        let mut cursor = Cursor::new(vec![0_u8; 7]);
        let error = SequenceHeader::read_from(&mut cursor).unwrap_err();
        match error {
            FrameError::ShortRead { expected, actual } => {
                assert_eq!(expected, HEADER_SIZE);
                assert_eq!(actual, 7);
            }
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    fn rewrite_lands_at_offset_zero() {
        let mut cursor = Cursor::new(vec![0xFF_u8; 32]);
        cursor.set_position(20);
        sample().rewrite_to(&mut cursor).unwrap();
        let written = cursor.into_inner();
        assert_eq!(&written[..HEADER_SIZE], &sample().to_bytes());
        // Bytes past the header are untouched.
        assert!(written[HEADER_SIZE..].iter().all(|&byte| byte == 0xFF));
    }

    #[test]
    fn derived_geometry() {
        let header = sample();
        assert_eq!(header.plane_size(), 120 * 160);
        assert_eq!(header.frame_size(), 3 * 120 * 160);
        assert_eq!(header.payload_size(), 300 * 3 * 120 * 160);
        assert_eq!(header.frame_offset(0), HEADER_SIZE as u64);
        assert_eq!(
            header.frame_offset(2),
            HEADER_SIZE as u64 + 2 * 3 * 120 * 160
        );
        assert!(header.has_pixels());
    }

    #[test]
    fn zero_dimension_has_no_pixels() {
        let header = SequenceHeader {
            frame_count: 10,
            channels: 0,
            height: 4,
            width: 4,
        };
        assert!(!header.has_pixels());
        assert_eq!(header.payload_size(), 0);
    }
}
