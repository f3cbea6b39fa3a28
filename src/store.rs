//! Frame storage access.
//!
//! The shared I/O layer every transform is built on. Four access modes are
//! provided, trading memory footprint for throughput:
//!
//! - **bulk** — the whole frame payload in one buffer
//!   ([`alloc_buffer`] + [`read_exact_counted`]);
//! - **batched** — bounded groups of frames ([`BatchPlan`]), the final batch
//!   shrunk to the remainder;
//! - **mapped** — the input file's frame region mapped read-only for random
//!   access without explicit seeks ([`MappedFrames`]);
//! - **single-frame** — one frame at an explicitly computed offset
//!   ([`read_frame_at`]).
//!
//! Every transfer is counted: a read or write that moves fewer bytes than the
//! layout requires fails the whole invocation with
//! [`FrameError::ShortRead`] / [`FrameError::ShortWrite`].

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::FrameError;
use crate::header::{HEADER_SIZE, SequenceHeader};

/// Default number of frames moved per batch in batched mode.
pub(crate) const DEFAULT_BATCH_FRAMES: usize = 1024;

/// Fill `buffer` completely from `reader`, counting transferred bytes.
///
/// Unlike [`Read::read_exact`], a premature end of stream reports how many
/// bytes actually arrived.
pub(crate) fn read_exact_counted<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
) -> Result<(), FrameError> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => {
                return Err(FrameError::ShortRead {
                    expected: buffer.len(),
                    actual: filled,
                });
            }
            Ok(count) => filled += count,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

/// Write all of `buffer` to `writer`, counting transferred bytes.
pub(crate) fn write_exact_counted<W: Write>(
    writer: &mut W,
    buffer: &[u8],
) -> Result<(), FrameError> {
    let mut written = 0;
    while written < buffer.len() {
        match writer.write(&buffer[written..]) {
            Ok(0) => {
                return Err(FrameError::ShortWrite {
                    expected: buffer.len(),
                    actual: written,
                });
            }
            Ok(count) => written += count,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

/// Allocate a zeroed working buffer of `bytes` bytes.
///
/// Allocation failure is a reportable error, not a process abort: the
/// reservation goes through [`Vec::try_reserve_exact`] and surfaces as
/// [`FrameError::Allocation`].
pub(crate) fn alloc_buffer(bytes: usize) -> Result<Vec<u8>, FrameError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| FrameError::Allocation { bytes })?;
    buffer.resize(bytes, 0);
    Ok(buffer)
}

/// One batch of contiguous frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Batch {
    /// Index of the first frame in the batch.
    pub(crate) start: i64,
    /// Number of frames in the batch. Always at least 1.
    pub(crate) frames: usize,
}

/// Iterator over the batches covering a sequence, front to back.
///
/// Yields full batches of `batch_frames` frames, shrinking the final batch to
/// whatever remains.
#[derive(Debug, Clone)]
pub(crate) struct BatchPlan {
    total: i64,
    batch_frames: usize,
    next: i64,
}

impl BatchPlan {
    pub(crate) fn new(total_frames: i64, batch_frames: usize) -> Self {
        Self {
            total: total_frames.max(0),
            batch_frames: batch_frames.max(1),
            next: 0,
        }
    }
}

impl Iterator for BatchPlan {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.next >= self.total {
            return None;
        }
        let remaining = (self.total - self.next) as usize;
        let frames = remaining.min(self.batch_frames);
        let batch = Batch {
            start: self.next,
            frames,
        };
        self.next += frames as i64;
        Some(batch)
    }
}

/// Seek to frame `index` and read exactly one frame into `buffer`.
///
/// `buffer` must be exactly [`SequenceHeader::frame_size`] bytes.
pub(crate) fn read_frame_at(
    file: &mut File,
    header: &SequenceHeader,
    index: i64,
    buffer: &mut [u8],
) -> Result<(), FrameError> {
    file.seek(SeekFrom::Start(header.frame_offset(index)))?;
    read_exact_counted(file, buffer)
}

/// The frame region of a sequence file, mapped read-only.
///
/// Frames are addressed by index with no per-access seeking, which suits the
/// non-sequential access order of reversal. The mapping covers the whole file
/// starting at offset 0; [`frame`](MappedFrames::frame) skips the header.
/// Only reads go through the map; output is still produced through ordinary
/// sequential writes.
pub(crate) struct MappedFrames {
    map: memmap2::Mmap,
    frame_size: usize,
}

impl MappedFrames {
    /// Map `file`'s frame region described by `header`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShortRead`] when the file is smaller than the
    /// header plus the declared payload, or [`FrameError::Io`] if the mapping
    /// itself fails.
    pub(crate) fn new(file: &File, header: &SequenceHeader) -> Result<Self, FrameError> {
        let expected = HEADER_SIZE + header.payload_size();
        // Safety: the mapping is read-only and the file is held open by the
        // caller for the lifetime of the map.
        let map = unsafe { memmap2::MmapOptions::new().map(file)? };
        if map.len() < expected {
            return Err(FrameError::ShortRead {
                expected,
                actual: map.len(),
            });
        }
        #[cfg(unix)]
        map.advise(memmap2::Advice::Random)?;
        Ok(Self {
            map,
            frame_size: header.frame_size(),
        })
    }

    /// Borrow frame `index` from the mapped region.
    pub(crate) fn frame(&self, index: i64) -> &[u8] {
        let start = HEADER_SIZE + index as usize * self.frame_size;
        &self.map[start..start + self.frame_size]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{Batch, BatchPlan, alloc_buffer, read_exact_counted, write_exact_counted};
    use crate::error::FrameError;

    #[test]
    fn batch_plan_covers_sequence_with_partial_tail() {
        let batches: Vec<Batch> = BatchPlan::new(2600, 1024).collect();
        assert_eq!(
            batches,
            vec![
                Batch {
                    start: 0,
                    frames: 1024
                },
                Batch {
                    start: 1024,
                    frames: 1024
                },
                Batch {
                    start: 2048,
                    frames: 552
                },
            ]
        );
    }

    #[test]
    fn batch_plan_single_short_batch() {
        let batches: Vec<Batch> = BatchPlan::new(3, 1024).collect();
        assert_eq!(batches, vec![Batch { start: 0, frames: 3 }]);
    }

    #[test]
    fn batch_plan_empty_sequence_yields_nothing() {
        assert_eq!(BatchPlan::new(0, 1024).count(), 0);
    }

    #[test]
    fn short_read_reports_counts() {
        let mut cursor = Cursor::new(vec![1_u8, 2, 3]);
        let mut buffer = [0_u8; 8];
        match read_exact_counted(&mut cursor, &mut buffer) {
            Err(FrameError::ShortRead { expected, actual }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 3);
            }
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    fn write_round_trip() {
        let mut sink = Cursor::new(Vec::new());
        write_exact_counted(&mut sink, &[9_u8; 16]).unwrap();
        assert_eq!(sink.into_inner(), vec![9_u8; 16]);
    }

    #[test]
    fn alloc_is_zeroed() {
        let buffer = alloc_buffer(64).unwrap();
        assert_eq!(buffer.len(), 64);
        assert!(buffer.iter().all(|&byte| byte == 0));
    }
}
