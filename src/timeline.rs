//! Temporal transforms: sequence reversal and frame-rate decimation.
//!
//! [`TimelineOps`] reorders or drops whole frames. Reversal is offered under
//! all three strategies and produces byte-identical output regardless of the
//! one chosen:
//!
//! - [`Strategy::Balanced`] — bulk load, in-place two-pointer frame swap.
//! - [`Strategy::Fast`] — memory-mapped input read back to front in bounded
//!   batches; each batch is fully resolved and flushed before the next.
//! - [`Strategy::Small`] — seek to each source frame from last to first and
//!   copy it through, one frame in memory at a time.
//!
//! Decimation streams single frames and rewrites the output header with the
//! reduced frame count before any frame data is appended.

use std::io::{Seek, Write};

use crate::error::FrameError;
use crate::header::SequenceHeader;
use crate::options::{Strategy, TransformOptions};
use crate::progress::{OperationType, ProgressTracker};
use crate::sequence::SequenceFile;
use crate::store::{self, MappedFrames};

/// Temporal operations on an open sequence.
///
/// Obtained via [`SequenceFile::timeline`].
pub struct TimelineOps<'a> {
    pub(crate) sequence: &'a mut SequenceFile,
}

impl TimelineOps<'_> {
    /// Write the sequence to `output` with frame order reversed.
    ///
    /// Reversal is an involution: reversing twice reproduces the original
    /// sequence exactly. The caller transfers the header beforehand — the
    /// frame count and dimensions do not change.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptyDimensions`] before any I/O if the header
    /// declares zero-pixel frames, or an I/O, allocation, or short-transfer
    /// error from the streaming run.
    pub fn reverse<W: Write>(
        &mut self,
        output: &mut W,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        let header = *self.sequence.header();
        if !header.has_pixels() {
            return Err(FrameError::EmptyDimensions);
        }

        log::debug!(
            "Reversing {} frame(s) with {:?} strategy",
            header.frame_count,
            options.strategy(),
        );

        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            OperationType::Reverse,
            Some(header.frame_count as u64),
            options.progress_interval,
        );

        match options.strategy() {
            Strategy::Balanced => self.reverse_bulk(output, &header, &mut tracker)?,
            Strategy::Fast => self.reverse_mapped(output, &header, options, &mut tracker)?,
            Strategy::Small => self.reverse_per_frame(output, &header, &mut tracker)?,
        }

        tracker.finish();
        Ok(())
    }

    /// Bulk: load the whole payload and swap whole-frame blocks in place,
    /// walking both ends toward the center.
    fn reverse_bulk<W: Write>(
        &mut self,
        output: &mut W,
        header: &SequenceHeader,
        tracker: &mut ProgressTracker,
    ) -> Result<(), FrameError> {
        let frame_size = header.frame_size();
        self.sequence.seek_payload()?;
        let mut payload = store::alloc_buffer(header.payload_size())?;
        store::read_exact_counted(&mut self.sequence.file, &mut payload)?;

        let count = header.frame_count as usize;
        if count > 1 {
            let mut start = 0;
            let mut end = count - 1;
            // The middle frame of an odd-length sequence is never touched.
            while start < end {
                let (head, tail) = payload.split_at_mut(end * frame_size);
                head[start * frame_size..(start + 1) * frame_size]
                    .swap_with_slice(&mut tail[..frame_size]);
                start += 1;
                end -= 1;
            }
        }

        store::write_exact_counted(output, &payload)?;
        tracker.advance(count as u64);
        Ok(())
    }

    /// Mapped-batched: random-access reads from a memory-mapped input,
    /// batches emitted in strictly descending original-index order.
    fn reverse_mapped<W: Write>(
        &mut self,
        output: &mut W,
        header: &SequenceHeader,
        options: &TransformOptions,
        tracker: &mut ProgressTracker,
    ) -> Result<(), FrameError> {
        if header.frame_count == 0 {
            return Ok(());
        }

        let frame_size = header.frame_size();
        let batch_frames = options
            .batch_frames()
            .min(header.frame_count as usize) as i64;
        let mapped = MappedFrames::new(&self.sequence.file, header)?;
        let mut write_buffer = store::alloc_buffer(batch_frames as usize * frame_size)?;

        // Walk batches from the last frame backward. Within a batch the
        // highest original index is emitted first, so concatenated batches
        // form exactly the reversed sequence.
        let mut batch_start = header.frame_count - 1;
        loop {
            let batch_end = (batch_start - batch_frames + 1).max(0);
            let frames_in_batch = (batch_start - batch_end + 1) as usize;

            for (slot, index) in (batch_end..=batch_start).rev().enumerate() {
                write_buffer[slot * frame_size..(slot + 1) * frame_size]
                    .copy_from_slice(mapped.frame(index));
            }

            store::write_exact_counted(output, &write_buffer[..frames_in_batch * frame_size])?;
            tracker.advance(frames_in_batch as u64);

            if batch_end == 0 {
                break;
            }
            batch_start = batch_end - 1;
        }
        Ok(())
    }

    /// Single-frame: explicit seek per source frame, last to first.
    fn reverse_per_frame<W: Write>(
        &mut self,
        output: &mut W,
        header: &SequenceHeader,
        tracker: &mut ProgressTracker,
    ) -> Result<(), FrameError> {
        let mut frame = store::alloc_buffer(header.frame_size())?;

        for index in (0..header.frame_count).rev() {
            store::read_frame_at(&mut self.sequence.file, header, index, &mut frame)?;
            store::write_exact_counted(output, &frame)?;
            tracker.advance(1);
        }
        Ok(())
    }

    /// Decimate the frame rate by `factor`, keeping original frames
    /// `0, factor, 2*factor, …`.
    ///
    /// The output header is rewritten at offset 0 with the new frame count
    /// (`frame_count / factor`, floored) before any frame data is appended;
    /// exactly that many frames are written. Dimensions are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidSpeedFactor`] before any I/O when
    /// `factor <= 1`, [`FrameError::EmptyDimensions`] for zero-pixel frames,
    /// or an I/O, allocation, or short-transfer error from the streaming run.
    pub fn speed_up<W: Write + Seek>(
        &mut self,
        output: &mut W,
        factor: i64,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        if factor <= 1 {
            return Err(FrameError::InvalidSpeedFactor { factor });
        }
        let header = *self.sequence.header();
        if !header.has_pixels() {
            return Err(FrameError::EmptyDimensions);
        }

        let retained = header.frame_count / factor;
        log::debug!(
            "Decimating by {factor}: {} -> {retained} frame(s)",
            header.frame_count,
        );

        let output_header = SequenceHeader {
            frame_count: retained,
            ..header
        };
        output_header.rewrite_to(output)?;

        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            OperationType::SpeedUp,
            Some(retained as u64),
            options.progress_interval,
        );

        self.sequence.seek_payload()?;
        let mut frame = store::alloc_buffer(header.frame_size())?;
        let mut written = 0_i64;

        for index in 0..header.frame_count {
            store::read_exact_counted(&mut self.sequence.file, &mut frame)?;
            if written < retained && index % factor == 0 {
                store::write_exact_counted(output, &frame)?;
                written += 1;
                tracker.advance(1);
            }
        }

        tracker.finish();
        Ok(())
    }
}
