//! Error types for the `reframe` crate.
//!
//! This module defines [`FrameError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to diagnose
//! the problem at the call site, including byte counts for short transfers and
//! the offending values for parameter validation failures.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `reframe` operations.
///
/// Every public method that can fail returns `Result<T, FrameError>`. The
/// library never terminates the process: I/O failures, allocation failures,
/// and parameter validation failures are all reported through this type, and
/// the caller decides how fatal each one is. Parameter validation runs before
/// any output I/O, so a validation error guarantees the output was not
/// touched by that invocation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameError {
    /// The sequence file could not be opened.
    #[error("Failed to open sequence file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::SequenceFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// Fewer bytes were read than the binary layout requires.
    ///
    /// Also produced for a truncated header (fewer than
    /// [`HEADER_SIZE`](crate::HEADER_SIZE) bytes available).
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes the layout requires.
        expected: usize,
        /// Bytes actually transferred before the stream ended.
        actual: usize,
    },

    /// Fewer bytes were written than requested.
    #[error("Short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite {
        /// Bytes that should have been written.
        expected: usize,
        /// Bytes actually accepted by the writer.
        actual: usize,
    },

    /// A working buffer could not be allocated.
    #[error("Failed to allocate a {bytes}-byte buffer")]
    Allocation {
        /// Requested buffer size in bytes.
        bytes: usize,
    },

    /// A channel index is not smaller than the sequence's channel count.
    #[error("Channel {channel} is out of range (sequence has {channels} channels)")]
    ChannelOutOfRange {
        /// The channel index that was requested.
        channel: u8,
        /// The number of channels in the sequence.
        channels: u8,
    },

    /// A clip range with `min > max` was requested.
    #[error("Invalid clip range: min ({min}) must not exceed max ({max})")]
    InvalidClipRange {
        /// Lower clamp bound.
        min: u8,
        /// Upper clamp bound.
        max: u8,
    },

    /// A decimation factor of 1 or less was requested.
    #[error("Speed-up factor must be greater than 1, got {factor}")]
    InvalidSpeedFactor {
        /// The factor that was rejected.
        factor: i64,
    },

    /// An aspect ratio string could not be parsed as `WIDTH:HEIGHT` with
    /// positive components.
    #[error("Invalid aspect ratio {input:?}: use WIDTH:HEIGHT (e.g. 16:9)")]
    InvalidAspectRatio {
        /// The rejected input string.
        input: String,
    },

    /// The header declares a negative frame count.
    #[error("Header declares a negative frame count ({0})")]
    NegativeFrameCount(i64),

    /// The header declares zero channels, height, or width, so frames carry
    /// no pixels and no transform is meaningful.
    #[error("Sequence has zero-sized frames: channels, height and width must all be non-zero")]
    EmptyDimensions,

    /// An I/O error occurred while reading, writing, seeking, or mapping.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}
