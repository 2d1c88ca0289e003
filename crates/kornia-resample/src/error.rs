use std::collections::TryReserveError;

/// Status code of a resampler, as reported by [`crate::Resampler::status`].
///
/// Once a resampler leaves [`ResampleStatus::Okay`] it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleStatus {
    /// No error occurred.
    Okay,
    /// A buffer or contributor list could not be allocated.
    OutOfMemory,
    /// The requested filter is not in the catalog.
    BadFilterName,
    /// The scanline buffer has no free slot for an incoming source row.
    ScanBufferFull,
    /// The configuration is inconsistent (extents, scales or supplied lists).
    InvalidConfig,
}

/// An error type for the resample module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResampleError {
    /// Error when a buffer could not be allocated.
    #[error("Failed to allocate resampler memory")]
    OutOfMemory(#[from] TryReserveError),

    /// Error when the filter name is not found in the catalog.
    #[error("Unknown filter name: {0}")]
    BadFilterName(String),

    /// Error when every slot of the scanline buffer is occupied.
    #[error("Scanline buffer is full ({0} slots)")]
    ScanBufferFull(usize),

    /// Error when a destination sample ends up without any contributor.
    #[error("Destination sample {0} has no contributors")]
    EmptyContributors(usize),

    /// Error when a source or destination extent is zero.
    #[error("Invalid extent: source {0}, destination {1}")]
    InvalidExtent(usize, usize),

    /// Error when the filter scale is not a positive finite number.
    #[error("Invalid filter scale: {0}")]
    InvalidFilterScale(f32),

    /// Error when a supplied contributor list does not match the configured extents.
    #[error("Contributor list extent ({1}) does not match the configured extent ({0})")]
    ContributorListMismatch(usize, usize),

    /// Error when a contributor points outside of the source extent.
    #[error("Source index {0} is out of range for extent {1}")]
    InvalidSourceIndex(usize, usize),

    /// Error when an input row does not match the source width.
    #[error("Row length ({0}) does not match the source width ({1})")]
    InvalidRowLength(usize, usize),

    /// Error when a plane does not hold `width * height` samples.
    #[error("Data length ({0}) does not match the plane size ({1})")]
    InvalidPlaneLength(usize, usize),

    /// Error when the source ran out while a destination row is still pending.
    #[error("Source exhausted before destination row {0} could be produced")]
    StreamStalled(usize),
}

impl ResampleError {
    /// Returns the status code this error puts a resampler into.
    pub fn status(&self) -> ResampleStatus {
        match self {
            ResampleError::OutOfMemory(_) | ResampleError::EmptyContributors(_) => {
                ResampleStatus::OutOfMemory
            }
            ResampleError::BadFilterName(_) => ResampleStatus::BadFilterName,
            ResampleError::ScanBufferFull(_) => ResampleStatus::ScanBufferFull,
            ResampleError::InvalidExtent(..)
            | ResampleError::InvalidFilterScale(_)
            | ResampleError::ContributorListMismatch(..)
            | ResampleError::InvalidSourceIndex(..)
            | ResampleError::InvalidRowLength(..)
            | ResampleError::InvalidPlaneLength(..)
            | ResampleError::StreamStalled(_) => ResampleStatus::InvalidConfig,
        }
    }
}
