//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for monitoring long-running
//! transforms and [`ProgressInfo`] for the snapshots delivered to it.
//! Transforms are synchronous and run to completion — there is no
//! cancellation; a callback observes progress but cannot halt the operation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reframe::{
//!     FrameError, ProgressCallback, ProgressInfo, SequenceFile, TransformOptions,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let mut sequence = SequenceFile::open("input.seq")?;
//! let mut output = std::fs::File::create("output.seq")?;
//! let options = TransformOptions::new().with_progress(Arc::new(PrintProgress));
//!
//! sequence.copy_header_to(&mut output)?;
//! sequence.timeline().reverse(&mut output, &options)?;
//! # Ok::<(), FrameError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The kind of transform currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Reversing frame order.
    Reverse,
    /// Exchanging two channel planes.
    SwapChannels,
    /// Clamping a channel's values.
    ClipChannel,
    /// Scaling a channel's values.
    ScaleChannel,
    /// Decimating the frame rate.
    SpeedUp,
    /// Cropping to a target aspect ratio.
    CropAspect,
}

/// A snapshot of transform progress.
///
/// Delivered to [`ProgressCallback::on_progress`] at a cadence controlled by
/// [`TransformOptions::with_progress_interval`](crate::TransformOptions::with_progress_interval).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many frames have been processed so far.
    pub current: u64,
    /// Total frames expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the transform started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates during a transform.
///
/// Implementations must be [`Send`] and [`Sync`] because callbacks may be
/// invoked while worker threads are processing the surrounding batch.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals during a transform.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    interval: u64,
    start_time: Instant,
    frames_since_last_report: u64,
}

impl ProgressTracker {
    /// Create a new tracker.
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        interval: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            interval: interval.max(1),
            start_time: Instant::now(),
            frames_since_last_report: 0,
        }
    }

    /// Record `frames` completed frames and fire the callback if the
    /// reporting interval is reached.
    pub(crate) fn advance(&mut self, frames: u64) {
        self.current += frames;
        self.frames_since_last_report += frames;

        if self.frames_since_last_report >= self.interval {
            self.report();
            self.frames_since_last_report = 0;
        }
    }

    /// Unconditionally emit a final progress report.
    pub(crate) fn finish(&mut self) {
        self.report();
    }

    fn report(&self) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
        };

        self.callback.on_progress(&info);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{OperationType, ProgressCallback, ProgressInfo, ProgressTracker};

    #[derive(Default)]
    struct Recorder {
        snapshots: Mutex<Vec<(u64, Option<f32>)>>,
    }

    impl ProgressCallback for Recorder {
        fn on_progress(&self, info: &ProgressInfo) {
            self.snapshots
                .lock()
                .unwrap()
                .push((info.current, info.percentage));
        }
    }

    #[test]
    fn tracker_batches_reports_by_interval() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker = ProgressTracker::new(
            recorder.clone(),
            OperationType::Reverse,
            Some(10),
            4,
        );

        for _ in 0..10 {
            tracker.advance(1);
        }
        tracker.finish();

        let snapshots = recorder.snapshots.lock().unwrap();
        // Reports at 4, 8, and the final flush at 10.
        assert_eq!(
            snapshots
                .iter()
                .map(|(current, _)| *current)
                .collect::<Vec<_>>(),
            vec![4, 8, 10]
        );
        assert_eq!(snapshots.last().unwrap().1, Some(100.0));
    }

    #[test]
    fn percentage_absent_without_total() {
        let recorder = Arc::new(Recorder::default());
        let mut tracker =
            ProgressTracker::new(recorder.clone(), OperationType::SpeedUp, None, 1);
        tracker.advance(5);
        let snapshots = recorder.snapshots.lock().unwrap();
        assert_eq!(snapshots[0], (5, None));
    }
}
