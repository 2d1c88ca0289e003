#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! A [`Resampler`] scales one plane of `f32` samples with a separable filter. Source rows
//! are pushed one by one and destination rows are pulled as soon as every source row they
//! depend on has arrived, so memory stays bounded by the filter footprint instead of the
//! image height.
//!
//! ```
//! use kornia_resample::{OutputLine, Resampler, ResamplerConfig};
//!
//! let mut config = ResamplerConfig::new([2, 2], [1, 1]);
//! config.filter = "box".to_string();
//! let mut resampler = Resampler::new(config).unwrap();
//!
//! resampler.put_line(&[1.0, 3.0]).unwrap();
//! assert_eq!(resampler.get_line().unwrap(), OutputLine::NotReady);
//!
//! resampler.put_line(&[5.0, 7.0]).unwrap();
//! assert_eq!(resampler.get_line().unwrap(), OutputLine::Ready(&[4.0]));
//! assert_eq!(resampler.get_line().unwrap(), OutputLine::Finished);
//! ```

/// boundary handling module.
pub mod border;

/// contributor lists module.
pub mod contrib;

/// Error types for the resample module.
pub mod error;

/// resampling filter kernels module.
pub mod filter;

/// whole plane helpers.
pub mod plane;

/// axis order planning module.
pub mod planner;

/// streaming resampler module.
pub mod resampler;

/// scanline buffer module.
pub mod scanline;

pub use crate::border::BoundaryOp;
pub use crate::contrib::{Contributor, ContributorList};
pub use crate::error::{ResampleError, ResampleStatus};
pub use crate::filter::{filter_count, filter_name, find_filter, FilterKernel};
pub use crate::plane::{resample_plane, resample_planes, PlaneSize};
pub use crate::resampler::{DstSubrect, OutputLine, Resampler, ResamplerConfig, StreamState};
