//! Sequence file access.
//!
//! [`SequenceFile`] is the entry point of the crate: it opens a raw sequence
//! file, reads and validates the header, and hands out the operation handles
//! ([`channels`](SequenceFile::channels), [`timeline`](SequenceFile::timeline),
//! [`geometry`](SequenceFile::geometry)) that perform transforms against a
//! caller-supplied output.
//!
//! The input file is owned for the lifetime of the `SequenceFile`; output
//! handles are only ever borrowed for the duration of a single transform, and
//! no transform retains any buffer or handle after it returns.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::channels::ChannelOps;
use crate::crop::GeometryOps;
use crate::error::FrameError;
use crate::header::{HEADER_SIZE, SequenceHeader};
use crate::timeline::TimelineOps;

/// An open raw frame sequence.
///
/// # Example
///
/// ```no_run
/// use reframe::{FrameError, SequenceFile, TransformOptions};
///
/// let mut sequence = SequenceFile::open("input.seq")?;
/// println!("{} frames", sequence.header().frame_count);
///
/// let mut output = std::fs::File::create("reversed.seq")?;
/// sequence.copy_header_to(&mut output)?;
/// sequence.timeline().reverse(&mut output, &TransformOptions::new())?;
/// # Ok::<(), FrameError>(())
/// ```
pub struct SequenceFile {
    pub(crate) file: File,
    pub(crate) header: SequenceHeader,
    /// Path to the opened file (kept for diagnostics).
    pub(crate) path: PathBuf,
}

impl Debug for SequenceFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SequenceFile")
            .field("header", &self.header)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SequenceFile {
    /// Open a sequence file and read its header.
    ///
    /// # Errors
    ///
    /// - [`FrameError::FileOpen`] if the file cannot be opened.
    /// - [`FrameError::ShortRead`] if fewer than [`HEADER_SIZE`] bytes are
    ///   available.
    /// - [`FrameError::NegativeFrameCount`] if the header declares a negative
    ///   frame count.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening sequence file: {}", path.display());

        let mut file = File::open(&path).map_err(|error| FrameError::FileOpen {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        let header = SequenceHeader::read_from(&mut file)?;
        if header.frame_count < 0 {
            return Err(FrameError::NegativeFrameCount(header.frame_count));
        }

        log::debug!(
            "Sequence: {} frame(s), {}x{} pixels, {} channel(s)",
            header.frame_count,
            header.width,
            header.height,
            header.channels,
        );

        Ok(Self { file, header, path })
    }

    /// The sequence header as read at open time.
    pub fn header(&self) -> &SequenceHeader {
        &self.header
    }

    /// Path this sequence was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Channel-plane operations: swap, clip, scale.
    pub fn channels(&mut self) -> ChannelOps<'_> {
        ChannelOps { sequence: self }
    }

    /// Temporal operations: reversal and frame-rate decimation.
    pub fn timeline(&mut self) -> TimelineOps<'_> {
        TimelineOps { sequence: self }
    }

    /// Spatial operations: aspect-ratio cropping.
    pub fn geometry(&mut self) -> GeometryOps<'_> {
        GeometryOps { sequence: self }
    }

    /// Write this sequence's header, unchanged, to `output`.
    ///
    /// Transforms that keep the sequence shape (reversal, channel operations)
    /// expect the caller to have transferred the header first; transforms
    /// that change the shape (decimation, cropping) rewrite it themselves.
    pub fn copy_header_to<W: Write>(&self, output: &mut W) -> Result<(), FrameError> {
        self.header.write_to(output)
    }

    /// Inspect the file for structural issues without reading frame data.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let header = &self.header;

        report.info.push(format!(
            "{} frame(s), {}x{} pixels, {} channel(s), {} bytes per frame",
            header.frame_count,
            header.width,
            header.height,
            header.channels,
            header.frame_size(),
        ));

        if header.frame_count == 0 {
            report
                .warnings
                .push("sequence contains no frames".to_string());
        }
        if !header.has_pixels() {
            report.errors.push(
                "zero-sized frames: channels, height and width must all be non-zero".to_string(),
            );
        }

        match self.file.metadata() {
            Ok(metadata) => {
                let expected = HEADER_SIZE as u64 + header.payload_size() as u64;
                let actual = metadata.len();
                if actual < expected {
                    report.errors.push(format!(
                        "file is {} byte(s) short of the declared payload ({actual} of {expected})",
                        expected - actual,
                    ));
                } else if actual > expected {
                    report.warnings.push(format!(
                        "{} trailing byte(s) beyond the declared payload",
                        actual - expected,
                    ));
                }
            }
            Err(error) => {
                report
                    .warnings
                    .push(format!("could not read file metadata: {error}"));
            }
        }

        report
    }

    /// Position the input file at the start of the frame payload.
    pub(crate) fn seek_payload(&mut self) -> Result<(), FrameError> {
        self.file.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
        Ok(())
    }
}

/// Summary of sequence file validation.
///
/// Produced by [`SequenceFile::validate`]. Contains lists of informational
/// notices, warnings, and errors found during validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Non-fatal issues that may affect transform results.
    pub warnings: Vec<String>,
    /// Fatal issues that will prevent transforms from succeeding.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found.
    ///
    /// Warnings do not affect this result — only errors make the report
    /// invalid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for line in &self.info {
            writeln!(f, "info: {line}")?;
        }
        for line in &self.warnings {
            writeln!(f, "warning: {line}")?;
        }
        for line in &self.errors {
            writeln!(f, "error: {line}")?;
        }
        Ok(())
    }
}
