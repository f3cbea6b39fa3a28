//! Channel-plane transforms: swap, clip, and scale.
//!
//! [`ChannelOps`] applies per-channel operations to every frame of a
//! sequence, streaming the result to a caller-supplied output. All three
//! operations validate their parameters before touching any I/O and preserve
//! frame order exactly.
//!
//! Strategy mapping:
//!
//! - [`Strategy::Balanced`] — bounded batches (default 1024 frames, final
//!   batch shrunk to the remainder), direct kernels, frames within a batch
//!   processed in parallel when the `rayon` feature is enabled.
//! - [`Strategy::Fast`] — the whole payload in one buffer, value-mapping
//!   kernels memoized through a [`LookupTable`] shared across the run.
//! - [`Strategy::Small`] — one frame in memory at a time.

use std::io::Write;

use crate::error::FrameError;
use crate::header::SequenceHeader;
use crate::kernels::{self, LookupTable};
use crate::options::{Strategy, TransformOptions};
use crate::parallel;
use crate::progress::{OperationType, ProgressTracker};
use crate::sequence::SequenceFile;
use crate::store::{self, BatchPlan};

/// Channel-plane operations on an open sequence.
///
/// Obtained via [`SequenceFile::channels`]. Each method reads every frame
/// from the input, transforms the addressed channel plane(s), and writes the
/// frame to `output` in its original position. The caller transfers the
/// header beforehand (see [`SequenceFile::copy_header_to`]) — these
/// operations never change the sequence shape.
pub struct ChannelOps<'a> {
    pub(crate) sequence: &'a mut SequenceFile,
}

/// One channel transform, applied identically to every frame.
#[derive(Debug, Clone, Copy)]
enum PlaneOp {
    Swap { first: u8, second: u8 },
    Clip { channel: u8, min: u8, max: u8 },
    Scale { channel: u8, factor: f32 },
}

impl PlaneOp {
    /// Apply with direct kernels.
    fn apply(&self, frame: &mut [u8], plane_size: usize) {
        match *self {
            PlaneOp::Swap { first, second } => {
                kernels::swap_planes(frame, plane_size, first, second);
            }
            PlaneOp::Clip { channel, min, max } => {
                kernels::clip_plane(plane_of(frame, plane_size, channel), min, max);
            }
            PlaneOp::Scale { channel, factor } => {
                kernels::scale_plane(plane_of(frame, plane_size, channel), factor);
            }
        }
    }

    /// Apply with lookup-table kernels where a value mapping exists.
    ///
    /// Swap moves whole planes and has nothing to memoize; it behaves the
    /// same as the direct form.
    fn apply_memoized(&self, frame: &mut [u8], plane_size: usize, table: &mut LookupTable) {
        match *self {
            PlaneOp::Swap { first, second } => {
                kernels::swap_planes(frame, plane_size, first, second);
            }
            PlaneOp::Clip { channel, min, max } => {
                kernels::clip_plane_lut(plane_of(frame, plane_size, channel), table, min, max);
            }
            PlaneOp::Scale { channel, factor } => {
                kernels::scale_plane_lut(plane_of(frame, plane_size, channel), table, factor);
            }
        }
    }

    fn operation_type(&self) -> OperationType {
        match self {
            PlaneOp::Swap { .. } => OperationType::SwapChannels,
            PlaneOp::Clip { .. } => OperationType::ClipChannel,
            PlaneOp::Scale { .. } => OperationType::ScaleChannel,
        }
    }
}

/// Borrow the plane of `channel` from a channel-major frame buffer.
fn plane_of(frame: &mut [u8], plane_size: usize, channel: u8) -> &mut [u8] {
    let start = usize::from(channel) * plane_size;
    &mut frame[start..start + plane_size]
}

fn ensure_channel(channel: u8, channels: u8) -> Result<(), FrameError> {
    if channel >= channels {
        return Err(FrameError::ChannelOutOfRange { channel, channels });
    }
    Ok(())
}

fn ensure_pixels(header: &SequenceHeader) -> Result<(), FrameError> {
    if !header.has_pixels() {
        return Err(FrameError::EmptyDimensions);
    }
    Ok(())
}

impl ChannelOps<'_> {
    /// Exchange the planes of channels `first` and `second` in every frame.
    ///
    /// Swapping the same pair twice restores the original sequence.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ChannelOutOfRange`] before any I/O if either
    /// index is not smaller than the sequence's channel count, or an I/O,
    /// allocation, or short-transfer error from the streaming run.
    pub fn swap<W: Write>(
        &mut self,
        output: &mut W,
        first: u8,
        second: u8,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        let channels = self.sequence.header().channels;
        ensure_channel(first, channels)?;
        ensure_channel(second, channels)?;
        log::debug!("Swapping channels {first} and {second}");
        self.run(output, PlaneOp::Swap { first, second }, options)
    }

    /// Clamp every value of `channel`'s plane to `[min, max]` in every frame.
    ///
    /// Clipping is idempotent: applying the same bounds twice yields the same
    /// bytes as applying them once.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ChannelOutOfRange`] or
    /// [`FrameError::InvalidClipRange`] (when `min > max`) before any I/O,
    /// or an I/O, allocation, or short-transfer error from the streaming run.
    pub fn clip<W: Write>(
        &mut self,
        output: &mut W,
        channel: u8,
        min: u8,
        max: u8,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        ensure_channel(channel, self.sequence.header().channels)?;
        if min > max {
            return Err(FrameError::InvalidClipRange { min, max });
        }
        log::debug!("Clipping channel {channel} to [{min}, {max}]");
        self.run(output, PlaneOp::Clip { channel, min, max }, options)
    }

    /// Multiply every value of `channel`'s plane by `factor` in every frame.
    ///
    /// Each product is clamped to `[0, 255]` and truncated toward zero; the
    /// lookup-table path used by [`Strategy::Fast`] reproduces the exact same
    /// result per input value.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ChannelOutOfRange`] before any I/O, or an I/O,
    /// allocation, or short-transfer error from the streaming run.
    pub fn scale<W: Write>(
        &mut self,
        output: &mut W,
        channel: u8,
        factor: f32,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        ensure_channel(channel, self.sequence.header().channels)?;
        log::debug!("Scaling channel {channel} by {factor}");
        self.run(output, PlaneOp::Scale { channel, factor }, options)
    }

    fn run<W: Write>(
        &mut self,
        output: &mut W,
        op: PlaneOp,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        let header = *self.sequence.header();
        ensure_pixels(&header)?;
        self.sequence.seek_payload()?;

        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            op.operation_type(),
            Some(header.frame_count as u64),
            options.progress_interval,
        );

        match options.strategy() {
            Strategy::Balanced => self.run_batched(output, op, &header, options, &mut tracker)?,
            Strategy::Fast => self.run_bulk(output, op, &header, &mut tracker)?,
            Strategy::Small => self.run_per_frame(output, op, &header, &mut tracker)?,
        }

        tracker.finish();
        Ok(())
    }

    /// Balanced: bounded batches, direct kernels, parallel across frames.
    fn run_batched<W: Write>(
        &mut self,
        output: &mut W,
        op: PlaneOp,
        header: &SequenceHeader,
        options: &TransformOptions,
        tracker: &mut ProgressTracker,
    ) -> Result<(), FrameError> {
        let frame_size = header.frame_size();
        let plane_size = header.plane_size();
        let batch_frames = options
            .batch_frames()
            .min(header.frame_count.max(1) as usize);
        let mut buffer = store::alloc_buffer(batch_frames * frame_size)?;

        for batch in BatchPlan::new(header.frame_count, batch_frames) {
            log::trace!("batch at frame {}: {} frame(s)", batch.start, batch.frames);
            let chunk = &mut buffer[..batch.frames * frame_size];
            store::read_exact_counted(&mut self.sequence.file, chunk)?;
            parallel::for_each_frame(chunk, frame_size, |frame| op.apply(frame, plane_size));
            store::write_exact_counted(output, chunk)?;
            tracker.advance(batch.frames as u64);
        }
        Ok(())
    }

    /// Fast: whole payload in memory, lookup-table kernels shared across the
    /// run.
    fn run_bulk<W: Write>(
        &mut self,
        output: &mut W,
        op: PlaneOp,
        header: &SequenceHeader,
        tracker: &mut ProgressTracker,
    ) -> Result<(), FrameError> {
        let frame_size = header.frame_size();
        let plane_size = header.plane_size();
        let mut payload = store::alloc_buffer(header.payload_size())?;
        store::read_exact_counted(&mut self.sequence.file, &mut payload)?;

        let mut table = LookupTable::new();
        for frame in payload.chunks_exact_mut(frame_size) {
            op.apply_memoized(frame, plane_size, &mut table);
            tracker.advance(1);
        }

        store::write_exact_counted(output, &payload)
    }

    /// Small: one frame in memory at a time.
    fn run_per_frame<W: Write>(
        &mut self,
        output: &mut W,
        op: PlaneOp,
        header: &SequenceHeader,
        tracker: &mut ProgressTracker,
    ) -> Result<(), FrameError> {
        let frame_size = header.frame_size();
        let plane_size = header.plane_size();
        let mut frame = store::alloc_buffer(frame_size)?;

        for _ in 0..header.frame_count {
            store::read_exact_counted(&mut self.sequence.file, &mut frame)?;
            op.apply(&mut frame, plane_size);
            store::write_exact_counted(output, &frame)?;
            tracker.advance(1);
        }
        Ok(())
    }
}
