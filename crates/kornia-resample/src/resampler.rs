use std::{ops::Range, sync::Arc};

use crate::{
    border::BoundaryOp,
    contrib::ContributorList,
    error::{ResampleError, ResampleStatus},
    filter::{find_filter, FilterKernel, DEFAULT_FILTER},
    planner::AxisPlan,
    scanline::{ScanlineBuffer, DEFAULT_SCAN_BUFFER_CAPACITY},
    PlaneSize,
};

/// A rectangle of the destination plane.
///
/// Only the rows and columns inside the rectangle are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DstSubrect {
    /// The first destination column.
    pub x: usize,
    /// The first destination row.
    pub y: usize,
    /// The number of destination columns.
    pub width: usize,
    /// The number of destination rows.
    pub height: usize,
}

impl DstSubrect {
    /// Whether the rectangle has a positive area and lies within `dst_size`.
    pub fn fits(&self, dst_size: PlaneSize) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        self.width > 0
            && self.height > 0
            && right.is_some_and(|r| r <= dst_size.width)
            && bottom.is_some_and(|b| b <= dst_size.height)
    }

    fn cols(&self) -> Range<usize> {
        self.x..self.x + self.width
    }
}

/// Configuration of a [`Resampler`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResamplerConfig {
    /// The size of the source plane.
    pub src_size: PlaneSize,
    /// The size of the destination plane.
    pub dst_size: PlaneSize,
    /// The boundary policy of both axes.
    pub boundary: BoundaryOp,
    /// Lower bound of the output samples. Clamping is active only if `sample_low < sample_high`.
    pub sample_low: f32,
    /// Upper bound of the output samples.
    pub sample_high: f32,
    /// The filter name, looked up in [`crate::filter::FILTERS`].
    pub filter: String,
    /// Horizontal filter scale, values above 1 blur and below 1 sharpen.
    pub filter_scale_x: f32,
    /// Vertical filter scale.
    pub filter_scale_y: f32,
    /// Horizontal offset of the sampling grid, in source pixels.
    pub src_offset_x: f32,
    /// Vertical offset of the sampling grid, in source pixels.
    pub src_offset_y: f32,
    /// The part of the destination to produce. Invalid rectangles fall back to the full plane.
    pub dst_subrect: Option<DstSubrect>,
    /// The maximum number of buffered source rows.
    pub scan_buffer_capacity: usize,
    /// A horizontal contributor list to reuse instead of building one.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub clist_x: Option<Arc<ContributorList>>,
    /// A vertical contributor list to reuse instead of building one.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub clist_y: Option<Arc<ContributorList>>,
}

impl ResamplerConfig {
    /// Create a configuration with default settings for the given sizes.
    pub fn new(src_size: impl Into<PlaneSize>, dst_size: impl Into<PlaneSize>) -> Self {
        Self {
            src_size: src_size.into(),
            dst_size: dst_size.into(),
            ..Default::default()
        }
    }
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self {
            src_size: PlaneSize::default(),
            dst_size: PlaneSize::default(),
            boundary: BoundaryOp::Clamp,
            sample_low: 0.0,
            sample_high: 0.0,
            filter: DEFAULT_FILTER.to_string(),
            filter_scale_x: 1.0,
            filter_scale_y: 1.0,
            src_offset_x: 0.0,
            src_offset_y: 0.0,
            dst_subrect: None,
            scan_buffer_capacity: DEFAULT_SCAN_BUFFER_CAPACITY,
            clist_x: None,
            clist_y: None,
        }
    }
}

/// Lifecycle of a [`Resampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Source rows are still accepted.
    Streaming,
    /// All source rows were given, destination rows remain to be pulled.
    Draining,
    /// Every destination row was produced.
    Done,
    /// An error occurred, see [`Resampler::status`].
    Failed,
}

/// The result of [`Resampler::get_line`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputLine<'a> {
    /// The next destination row.
    Ready(&'a [f32]),
    /// More source rows are needed.
    NotReady,
    /// All destination rows were produced.
    Finished,
}

/// A streaming separable resampler for a single plane of `f32` samples.
///
/// Source rows are pushed in order with [`Resampler::put_line`] and destination rows are
/// pulled in order with [`Resampler::get_line`]. Only the source rows still referenced by a
/// pending destination row are kept in memory.
///
/// Any error other than a mis-sized row is sticky: once failed, every further call returns
/// the same error.
pub struct Resampler {
    src_size: PlaneSize,
    dst_size: PlaneSize,
    subrect: DstSubrect,
    clamp: Option<(f32, f32)>,
    clist_x: Arc<ContributorList>,
    clist_y: Arc<ContributorList>,
    plan: AxisPlan,
    scan_buf: ScanlineBuffer,
    // output row, subrect width
    dst_buf: Vec<f32>,
    // vertical sum before the deferred horizontal pass, source width
    tmp_buf: Vec<f32>,
    // slots feeding the current destination row
    pending: Vec<usize>,
    cur_src_y: usize,
    cur_dst_y: usize,
    failure: Option<ResampleError>,
}

fn try_zeroed(len: usize) -> Result<Vec<f32>, ResampleError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, 0.0);
    Ok(v)
}

// builds a list for one axis, or checks the supplied one against the extents
fn axis_list(
    supplied: Option<Arc<ContributorList>>,
    src_extent: usize,
    dst_extent: usize,
    boundary: BoundaryOp,
    filter: &FilterKernel,
    filter_scale: f32,
    src_offset: f32,
) -> Result<Arc<ContributorList>, ResampleError> {
    match supplied {
        Some(clist) => {
            if clist.len() != dst_extent {
                return Err(ResampleError::ContributorListMismatch(
                    dst_extent,
                    clist.len(),
                ));
            }
            if clist.src_extent() != src_extent {
                return Err(ResampleError::ContributorListMismatch(
                    src_extent,
                    clist.src_extent(),
                ));
            }
            Ok(clist)
        }
        None => {
            let clist = ContributorList::build(
                src_extent,
                dst_extent,
                boundary,
                filter,
                filter_scale,
                src_offset,
            )?;
            Ok(Arc::new(clist))
        }
    }
}

/// Horizontal pass: `dst[k] = sum(src[c.pixel] * c.weight)` over the contributors of column
/// `cols.start + k`.
fn resample_x(dst: &mut [f32], src: &[f32], clist_x: &ContributorList, cols: Range<usize>) {
    for (out, i) in dst.iter_mut().zip(cols) {
        *out = clist_x[i].iter().map(|c| src[c.pixel] * c.weight).sum();
    }
}

fn scale_y_mov(dst: &mut [f32], src: &[f32], weight: f32) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s * weight;
    }
}

fn scale_y_add(dst: &mut [f32], src: &[f32], weight: f32) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += s * weight;
    }
}

impl Resampler {
    /// Create a new resampler.
    ///
    /// # Arguments
    ///
    /// * `config` - The resampler configuration.
    ///
    /// # Errors
    ///
    /// Fails when an extent is zero, the filter is unknown, a supplied contributor list does
    /// not match the extents, or memory cannot be allocated.
    pub fn new(config: ResamplerConfig) -> Result<Self, ResampleError> {
        let ResamplerConfig {
            src_size,
            dst_size,
            boundary,
            sample_low,
            sample_high,
            filter,
            filter_scale_x,
            filter_scale_y,
            src_offset_x,
            src_offset_y,
            dst_subrect,
            scan_buffer_capacity,
            clist_x,
            clist_y,
        } = config;

        if src_size.width == 0 || dst_size.width == 0 {
            return Err(ResampleError::InvalidExtent(src_size.width, dst_size.width));
        }
        if src_size.height == 0 || dst_size.height == 0 {
            return Err(ResampleError::InvalidExtent(
                src_size.height,
                dst_size.height,
            ));
        }

        let full = DstSubrect {
            x: 0,
            y: 0,
            width: dst_size.width,
            height: dst_size.height,
        };
        let subrect = match dst_subrect {
            Some(rect) if rect.fits(dst_size) => rect,
            Some(rect) => {
                log::debug!("ignoring destination subrect {:?} outside of {}", rect, dst_size);
                full
            }
            None => full,
        };

        let kernel = find_filter(&filter).ok_or(ResampleError::BadFilterName(filter))?;

        let clist_x = axis_list(
            clist_x,
            src_size.width,
            dst_size.width,
            boundary,
            kernel,
            filter_scale_x,
            src_offset_x,
        )?;
        let clist_y = axis_list(
            clist_y,
            src_size.height,
            dst_size.height,
            boundary,
            kernel,
            filter_scale_y,
            src_offset_y,
        )?;

        let plan = AxisPlan::new(&clist_x, &clist_y, src_size, dst_size, subrect.width);
        let scan_buf =
            ScanlineBuffer::new(scan_buffer_capacity, plan.intermediate_width, &clist_y)?;

        let dst_buf = try_zeroed(subrect.width)?;
        let tmp_buf = if plan.delay_x() {
            try_zeroed(src_size.width)?
        } else {
            Vec::new()
        };

        let max_taps = clist_y.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut pending = Vec::new();
        pending.try_reserve_exact(max_taps)?;

        log::debug!(
            "resampler {} -> {} with {} (subrect {:?}, {} scan slots)",
            src_size,
            dst_size,
            kernel.name(),
            subrect,
            scan_buffer_capacity
        );

        Ok(Self {
            src_size,
            dst_size,
            subrect,
            clamp: (sample_low < sample_high).then_some((sample_low, sample_high)),
            clist_x,
            clist_y,
            plan,
            scan_buf,
            dst_buf,
            tmp_buf,
            pending,
            cur_src_y: 0,
            cur_dst_y: subrect.y,
            failure: None,
        })
    }

    fn fail(&mut self, err: ResampleError) -> ResampleError {
        log::warn!("resampler failed: {}", err);
        self.failure = Some(err.clone());
        err
    }

    fn check_failed(&self) -> Result<(), ResampleError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn buffer_row(&mut self, row: &[f32]) -> Result<(), ResampleError> {
        let slot = self.scan_buf.acquire_free_slot()?;
        let data = self.scan_buf.store(slot, self.cur_src_y)?;
        if self.plan.delay_x() {
            data.copy_from_slice(row);
        } else {
            resample_x(data, row, &self.clist_x, self.subrect.cols());
        }
        Ok(())
    }

    /// Push the next source row.
    ///
    /// # Arguments
    ///
    /// * `row` - The samples of the row, exactly `src_size.width` of them.
    ///
    /// # Returns
    ///
    /// `false` if every source row was already given, `true` otherwise.
    ///
    /// # Errors
    ///
    /// [`ResampleError::InvalidRowLength`] for a mis-sized row, which leaves the resampler
    /// usable. [`ResampleError::ScanBufferFull`] or [`ResampleError::OutOfMemory`] when the
    /// row cannot be buffered, after which the resampler is failed.
    pub fn put_line(&mut self, row: &[f32]) -> Result<bool, ResampleError> {
        self.check_failed()?;

        if self.cur_src_y >= self.src_size.height {
            return Ok(false);
        }

        if row.len() != self.src_size.width {
            return Err(ResampleError::InvalidRowLength(
                row.len(),
                self.src_size.width,
            ));
        }

        if self.scan_buf.initial_use_count(self.cur_src_y) > 0 {
            if let Err(err) = self.buffer_row(row) {
                return Err(self.fail(err));
            }
        } else {
            log::trace!("source row {} is not used", self.cur_src_y);
        }

        self.cur_src_y += 1;
        Ok(true)
    }

    /// Pull the next destination row.
    ///
    /// The returned row has `subrect.width` samples and is valid until the next call.
    pub fn get_line(&mut self) -> Result<OutputLine<'_>, ResampleError> {
        self.check_failed()?;

        if self.cur_dst_y >= self.subrect.y + self.subrect.height {
            return Ok(OutputLine::Finished);
        }

        let contribs = &self.clist_y[self.cur_dst_y];
        self.pending.clear();
        for c in contribs {
            match self.scan_buf.find(c.pixel) {
                Some(slot) => self.pending.push(slot),
                None => return Ok(OutputLine::NotReady),
            }
        }

        let delay_x = self.plan.delay_x();
        let acc = if delay_x {
            &mut self.tmp_buf
        } else {
            &mut self.dst_buf
        };
        for (i, (c, &slot)) in contribs.iter().zip(&self.pending).enumerate() {
            let src = self.scan_buf.data(slot);
            if i == 0 {
                scale_y_mov(acc, src, c.weight);
            } else {
                scale_y_add(acc, src, c.weight);
            }
        }

        if delay_x {
            resample_x(
                &mut self.dst_buf,
                &self.tmp_buf,
                &self.clist_x,
                self.subrect.cols(),
            );
        }

        if let Some((lo, hi)) = self.clamp {
            for v in self.dst_buf.iter_mut() {
                *v = v.clamp(lo, hi);
            }
        }

        for &slot in &self.pending {
            self.scan_buf.release(slot);
        }

        log::trace!("destination row {} produced", self.cur_dst_y);
        self.cur_dst_y += 1;

        Ok(OutputLine::Ready(&self.dst_buf))
    }

    /// The status code of the resampler.
    pub fn status(&self) -> ResampleStatus {
        self.failure
            .as_ref()
            .map_or(ResampleStatus::Okay, ResampleError::status)
    }

    /// The error that failed the resampler, if any.
    pub fn error(&self) -> Option<&ResampleError> {
        self.failure.as_ref()
    }

    /// The lifecycle state of the resampler.
    pub fn state(&self) -> StreamState {
        if self.failure.is_some() {
            StreamState::Failed
        } else if self.cur_dst_y >= self.subrect.y + self.subrect.height {
            StreamState::Done
        } else if self.cur_src_y < self.src_size.height {
            StreamState::Streaming
        } else {
            StreamState::Draining
        }
    }

    /// The horizontal contributor list, shareable with sibling resamplers.
    pub fn clist_x(&self) -> &Arc<ContributorList> {
        &self.clist_x
    }

    /// The vertical contributor list, shareable with sibling resamplers.
    pub fn clist_y(&self) -> &Arc<ContributorList> {
        &self.clist_y
    }

    /// The axis plan chosen at construction.
    pub fn plan(&self) -> &AxisPlan {
        &self.plan
    }

    /// The size of the source plane.
    pub fn src_size(&self) -> PlaneSize {
        self.src_size
    }

    /// The size of the destination plane.
    pub fn dst_size(&self) -> PlaneSize {
        self.dst_size
    }

    /// The produced part of the destination, the full plane if no valid subrect was given.
    pub fn dst_subrect(&self) -> DstSubrect {
        self.subrect
    }

    /// The index of the next source row to push.
    pub fn cur_src_row(&self) -> usize {
        self.cur_src_y
    }

    /// The index of the next destination row to pull.
    pub fn cur_dst_row(&self) -> usize {
        self.cur_dst_y
    }

    /// The scanline buffer, for occupancy statistics.
    pub fn scan_buffer(&self) -> &ScanlineBuffer {
        &self.scan_buf
    }
}
