//! Spatial transforms: centered aspect-ratio cropping.
//!
//! [`GeometryOps`] crops every frame to a target aspect ratio, preserving
//! the dimension the target already satisfies and shrinking the other. The
//! crop window is centered, the output header carries the new dimensions, and
//! the frame count is unchanged.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Seek, Write};
use std::str::FromStr;

use crate::error::FrameError;
use crate::header::SequenceHeader;
use crate::options::TransformOptions;
use crate::progress::{OperationType, ProgressTracker};
use crate::sequence::SequenceFile;
use crate::store;

/// A target aspect ratio, parsed from `"WIDTH:HEIGHT"`.
///
/// # Example
///
/// ```
/// use reframe::AspectRatio;
///
/// let ratio: AspectRatio = "16:9".parse()?;
/// assert_eq!(ratio.width(), 16);
/// assert_eq!(ratio.height(), 9);
/// assert!((ratio.ratio() - 16.0 / 9.0).abs() < f32::EPSILON);
/// # Ok::<(), reframe::FrameError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// Create an aspect ratio from positive width and height components.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidAspectRatio`] if either component is 0.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidAspectRatio {
                input: format!("{width}:{height}"),
            });
        }
        Ok(Self { width, height })
    }

    /// The width component.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height component.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl FromStr for AspectRatio {
    type Err = FrameError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || FrameError::InvalidAspectRatio {
            input: input.to_string(),
        };
        let (width, height) = input.split_once(':').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;
        Self::new(width, height).map_err(|_| invalid())
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Spatial operations on an open sequence.
///
/// Obtained via [`SequenceFile::geometry`].
pub struct GeometryOps<'a> {
    pub(crate) sequence: &'a mut SequenceFile,
}

impl GeometryOps<'_> {
    /// Crop every frame to a centered window matching `ratio`.
    ///
    /// The dimension the target ratio already satisfies is preserved and the
    /// other is reduced: when the original ratio exceeds the target, width
    /// becomes `trunc(height * ratio)` with height unchanged; otherwise
    /// height becomes `trunc(width / ratio)` with width unchanged. The window
    /// is centered with truncating integer division, so an odd margin leans
    /// one pixel toward the top-left.
    ///
    /// The output header is rewritten at offset 0 with the new dimensions
    /// before any frame data is appended. Frames are streamed one at a time;
    /// the strategy selector has no effect on this operation.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptyDimensions`] before any I/O for zero-pixel
    /// frames, or an I/O, allocation, or short-transfer error from the
    /// streaming run.
    pub fn crop_aspect<W: Write + Seek>(
        &mut self,
        output: &mut W,
        ratio: AspectRatio,
        options: &TransformOptions,
    ) -> Result<(), FrameError> {
        let header = *self.sequence.header();
        if !header.has_pixels() {
            return Err(FrameError::EmptyDimensions);
        }

        let (target_width, target_height) =
            target_dimensions(header.width, header.height, ratio.ratio());
        let crop_top = usize::from((header.height - target_height) / 2);
        let crop_left = usize::from((header.width - target_width) / 2);

        log::debug!(
            "Cropping {}x{} to {target_width}x{target_height} for ratio {ratio} \
             (window at row {crop_top}, column {crop_left})",
            header.width,
            header.height,
        );

        let output_header = SequenceHeader {
            height: target_height,
            width: target_width,
            ..header
        };
        output_header.rewrite_to(output)?;

        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            OperationType::CropAspect,
            Some(header.frame_count as u64),
            options.progress_interval,
        );

        self.sequence.seek_payload()?;
        let mut source = store::alloc_buffer(header.frame_size())?;
        let mut cropped = store::alloc_buffer(output_header.frame_size())?;

        for _ in 0..header.frame_count {
            store::read_exact_counted(&mut self.sequence.file, &mut source)?;
            copy_window(
                &source,
                &mut cropped,
                &header,
                &output_header,
                crop_top,
                crop_left,
            );
            store::write_exact_counted(output, &cropped)?;
            tracker.advance(1);
        }

        tracker.finish();
        Ok(())
    }
}

/// Output dimensions for cropping `width`x`height` to `target_ratio`,
/// preserving the dimension the target already satisfies.
fn target_dimensions(width: u8, height: u8, target_ratio: f32) -> (u8, u8) {
    let original_ratio = f32::from(width) / f32::from(height);
    if original_ratio > target_ratio {
        ((f32::from(height) * target_ratio) as u8, height)
    } else {
        (width, (f32::from(width) / target_ratio) as u8)
    }
}

/// Copy the centered crop window of every channel plane, row by row.
fn copy_window(
    source: &[u8],
    cropped: &mut [u8],
    input: &SequenceHeader,
    output: &SequenceHeader,
    crop_top: usize,
    crop_left: usize,
) {
    let source_plane = input.plane_size();
    let cropped_plane = output.plane_size();
    let source_width = usize::from(input.width);
    let cropped_width = usize::from(output.width);

    for channel in 0..usize::from(input.channels) {
        let source_base = channel * source_plane;
        let cropped_base = channel * cropped_plane;
        for row in 0..usize::from(output.height) {
            let source_row = source_base + (row + crop_top) * source_width + crop_left;
            let cropped_row = cropped_base + row * cropped_width;
            cropped[cropped_row..cropped_row + cropped_width]
                .copy_from_slice(&source[source_row..source_row + cropped_width]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AspectRatio, target_dimensions};

    #[test]
    fn parse_well_formed() {
        let ratio: AspectRatio = "16:9".parse().unwrap();
        assert_eq!((ratio.width(), ratio.height()), (16, 9));
        assert_eq!(ratio.to_string(), "16:9");
    }

    #[test]
    fn parse_tolerates_spaces() {
        let ratio: AspectRatio = " 4 : 3 ".parse().unwrap();
        assert_eq!((ratio.width(), ratio.height()), (4, 3));
    }

    #[test]
    fn parse_rejects_malformed() {
        for input in ["", "16", "16:", ":9", "16:9:1", "a:b", "0:9", "16:0", "-16:9"] {
            assert!(
                input.parse::<AspectRatio>().is_err(),
                "expected {input:?} to be rejected",
            );
        }
    }

    #[test]
    fn wider_than_target_reduces_width() {
        // 16x9 is wider than 4:3 -> keep height, width = trunc(9 * 4/3) = 12.
        assert_eq!(target_dimensions(16, 9, 4.0 / 3.0), (12, 9));
    }

    #[test]
    fn narrower_than_target_reduces_height() {
        // 9x16 is narrower than 4:3 -> keep width, height = trunc(9 / (4/3)) = 6.
        assert_eq!(target_dimensions(9, 16, 4.0 / 3.0), (9, 6));
    }

    #[test]
    fn matching_ratio_is_unchanged() {
        assert_eq!(target_dimensions(16, 9, 16.0 / 9.0), (16, 9));
    }
}
