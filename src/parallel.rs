//! Parallel frame processing within a batch.
//!
//! Frames inside one batch buffer occupy disjoint byte ranges, so per-frame
//! kernels can run on worker threads without synchronization. With the
//! `rayon` feature enabled the work is distributed across the rayon thread
//! pool; without it the same helper degrades to a sequential loop. Output
//! order is unaffected either way — the batch is written back as one block
//! after every frame has been transformed.

#[cfg(feature = "rayon")]
use ::rayon::prelude::*;

/// Apply `transform` to every `frame_size`-byte frame in `buffer`.
///
/// `buffer` must hold a whole number of frames and `frame_size` must be
/// non-zero.
#[cfg(feature = "rayon")]
pub(crate) fn for_each_frame<F>(buffer: &mut [u8], frame_size: usize, transform: F)
where
    F: Fn(&mut [u8]) + Send + Sync,
{
    buffer
        .par_chunks_exact_mut(frame_size)
        .for_each(|frame| transform(frame));
}

/// Apply `transform` to every `frame_size`-byte frame in `buffer`.
///
/// Sequential fallback used when the `rayon` feature is disabled.
#[cfg(not(feature = "rayon"))]
pub(crate) fn for_each_frame<F>(buffer: &mut [u8], frame_size: usize, transform: F)
where
    F: Fn(&mut [u8]) + Send + Sync,
{
    for frame in buffer.chunks_exact_mut(frame_size) {
        transform(frame);
    }
}
