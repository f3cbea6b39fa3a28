//! # reframe
//!
//! Transform raw planar frame sequences — reverse, swap, clip, scale,
//! decimate, and crop headered video files.
//!
//! A sequence file is an 11-byte header (frame count, channels, height,
//! width) followed by fixed-size frames of channel-major pixel bytes.
//! `reframe` streams such files through whole-sequence and per-frame
//! transforms, each offered under three execution strategies that trade
//! memory footprint for throughput — see [`Strategy`].
//!
//! ## Quick Start
//!
//! ### Reverse a sequence
//!
//! ```no_run
//! use reframe::{FrameError, SequenceFile, TransformOptions};
//!
//! let mut sequence = SequenceFile::open("input.seq")?;
//! let mut output = std::fs::File::create("reversed.seq")?;
//!
//! sequence.copy_header_to(&mut output)?;
//! sequence.timeline().reverse(&mut output, &TransformOptions::new())?;
//! # Ok::<(), FrameError>(())
//! ```
//!
//! ### Scale a channel with the single-frame strategy
//!
//! ```no_run
//! use reframe::{FrameError, SequenceFile, Strategy, TransformOptions};
//!
//! let mut sequence = SequenceFile::open("input.seq")?;
//! let mut output = std::fs::File::create("brighter.seq")?;
//! let options = TransformOptions::new().with_strategy(Strategy::Small);
//!
//! sequence.copy_header_to(&mut output)?;
//! sequence.channels().scale(&mut output, 0, 1.5, &options)?;
//! # Ok::<(), FrameError>(())
//! ```
//!
//! ### Crop to an aspect ratio
//!
//! ```no_run
//! use reframe::{AspectRatio, FrameError, SequenceFile, TransformOptions};
//!
//! let mut sequence = SequenceFile::open("input.seq")?;
//! let mut output = std::fs::File::create("cropped.seq")?;
//!
//! // The cropper rewrites the header itself - no copy_header_to here.
//! let ratio: AspectRatio = "4:3".parse()?;
//! sequence
//!     .geometry()
//!     .crop_aspect(&mut output, ratio, &TransformOptions::new())?;
//! # Ok::<(), FrameError>(())
//! ```
//!
//! ## Transforms
//!
//! - **Reversal** — frame order inverted; bulk, memory-mapped batched, or
//!   seek-per-frame execution, all byte-identical.
//! - **Channel swap** — exchange two channel planes in every frame.
//! - **Channel clip** — clamp a channel's values to `[min, max]`.
//! - **Channel scale** — multiply a channel's values by a float factor,
//!   clamped to `[0, 255]` and truncated.
//! - **Speed-up** — keep every Nth frame and rewrite the frame count.
//! - **Aspect crop** — centered crop to a `W:H` target ratio.
//!
//! Value-mapping kernels come in direct and lookup-table-memoized variants
//! (see [`kernels`]); the [`Strategy::Fast`] path uses the memoized forms.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Parallelizes per-frame kernels across a batch via rayon |
//! | `full`  | Enables all of the above |
//!
//! ## Errors
//!
//! All fallible operations return [`FrameError`]. Parameter validation
//! (channel indices, clip bounds, speed factors, aspect strings) happens
//! before any I/O; I/O and allocation failures abort the invocation
//! immediately with no retry and no partial-result recovery.

pub mod channels;
pub mod crop;
pub mod error;
pub mod header;
pub mod kernels;
pub mod options;
mod parallel;
pub mod progress;
pub mod sequence;
pub mod stats;
mod store;
pub mod timeline;

pub use channels::ChannelOps;
pub use crop::{AspectRatio, GeometryOps};
pub use error::FrameError;
pub use header::{HEADER_SIZE, SequenceHeader};
pub use kernels::LookupTable;
pub use options::{Strategy, TransformOptions};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use sequence::{SequenceFile, ValidationReport};
pub use stats::{RunStats, measure};
pub use timeline::TimelineOps;
