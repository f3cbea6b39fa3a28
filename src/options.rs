//! Transform configuration.
//!
//! [`TransformOptions`] is a builder that threads the execution strategy,
//! batch sizing, and progress callbacks through transform methods without
//! polluting every function signature.
//!
//! # Example
//!
//! ```
//! use reframe::{Strategy, TransformOptions};
//!
//! let options = TransformOptions::new()
//!     .with_strategy(Strategy::Small)
//!     .with_batch_frames(256);
//! assert_eq!(options.strategy(), Strategy::Small);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Memory-versus-throughput execution strategy.
///
/// Every transform produces byte-identical output under all three strategies;
/// the selector only changes how frame data moves between storage and memory:
///
/// - [`Balanced`](Strategy::Balanced) — bounded batches of frames (default
///   1024), amortizing per-frame I/O overhead without holding the whole
///   sequence.
/// - [`Fast`](Strategy::Fast) — the whole payload in memory at once (bulk
///   load, or a memory-mapped read region for reversal); fewest I/O calls,
///   highest memory. Value-mapping kernels memoize through a lookup table on
///   this path.
/// - [`Small`](Strategy::Small) — a single frame in memory at a time; minimal
///   footprint, one read/write pair per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Bounded batches of frames. The default.
    #[default]
    Balanced,
    /// Whole payload in memory (bulk or memory-mapped).
    Fast,
    /// One frame in memory at a time.
    Small,
}

/// Configuration for transform operations.
///
/// Carries the execution [`Strategy`], the batch size used by batched code
/// paths, and an optional progress callback. All fields have defaults — a
/// default-constructed value runs the balanced strategy silently.
#[derive(Clone)]
pub struct TransformOptions {
    /// Execution strategy.
    pub(crate) strategy: Strategy,
    /// Frames per batch for batched code paths. Clamped to at least 1.
    pub(crate) batch_frames: usize,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) progress_interval: u64,
}

impl Debug for TransformOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TransformOptions")
            .field("strategy", &self.strategy)
            .field("batch_frames", &self.batch_frames)
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformOptions {
    /// Create a new configuration with default settings.
    ///
    /// Defaults: [`Strategy::Balanced`], 1024 frames per batch, no progress
    /// callback, progress interval 64.
    pub fn new() -> Self {
        Self {
            strategy: Strategy::default(),
            batch_frames: crate::store::DEFAULT_BATCH_FRAMES,
            progress: Arc::new(NoOpProgress),
            progress_interval: 64,
        }
    }

    /// Select the execution strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set how many frames batched code paths move per batch.
    ///
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_frames(mut self, frames: usize) -> Self {
        self.batch_frames = frames.max(1);
        self
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked roughly every
    /// [`progress_interval`](TransformOptions::with_progress_interval) frames
    /// and once more when the transform completes.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires, in frames.
    ///
    /// A value of 1 means every frame. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_progress_interval(mut self, frames: u64) -> Self {
        self.progress_interval = frames.max(1);
        self
    }

    /// The configured execution strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The configured batch size in frames.
    pub fn batch_frames(&self) -> usize {
        self.batch_frames
    }
}

#[cfg(test)]
mod tests {
    use super::{Strategy, TransformOptions};

    #[test]
    fn defaults() {
        let options = TransformOptions::new();
        assert_eq!(options.strategy(), Strategy::Balanced);
        assert_eq!(options.batch_frames(), 1024);
        let debug = format!("{options:?}");
        assert!(debug.contains("TransformOptions"));
        assert!(debug.contains("progress_interval: 64"));
    }

    #[test]
    fn batch_frames_clamps_zero() {
        let options = TransformOptions::new().with_batch_frames(0);
        assert_eq!(options.batch_frames(), 1);
    }

    #[test]
    fn progress_interval_clamps_zero() {
        let options = TransformOptions::new().with_progress_interval(0);
        assert_eq!(options.progress_interval, 1);
    }
}
