use std::ops::{Index, Range};

use crate::{border::BoundaryOp, error::ResampleError, filter::FilterKernel};

/// A source sample feeding a destination sample along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contributor {
    /// Index of the source sample, within `[0, src_extent)`.
    pub pixel: usize,
    /// Normalized weight of the source sample.
    pub weight: f32,
}

/// The contributors of every destination sample along one axis.
///
/// All contributors live in a single pool; each destination index owns a span of it.
/// The weights of every span sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributorList {
    src_extent: usize,
    pool: Vec<Contributor>,
    spans: Vec<Range<usize>>,
}

struct Bounds {
    center: f32,
    left: isize,
    right: isize,
}

fn try_vec<T>(capacity: usize) -> Result<Vec<T>, ResampleError> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)?;
    Ok(v)
}

impl ContributorList {
    /// Build the contributor list of one axis.
    ///
    /// # Arguments
    ///
    /// * `src_extent` - The number of source samples along the axis.
    /// * `dst_extent` - The number of destination samples along the axis.
    /// * `boundary` - The policy for source indices falling outside of the source.
    /// * `filter` - The resampling kernel.
    /// * `filter_scale` - Multiplier of the kernel width. Values above one blur, below one sharpen.
    /// * `src_offset` - Sub-sample offset added to every source position.
    ///
    /// # Returns
    ///
    /// The contributor list, with `dst_extent` entries.
    ///
    /// # Errors
    ///
    /// Fails if an extent is zero, if the filter scale is not positive, if memory cannot be
    /// allocated or if a destination sample ends up without contributors.
    pub fn build(
        src_extent: usize,
        dst_extent: usize,
        boundary: BoundaryOp,
        filter: &FilterKernel,
        filter_scale: f32,
        src_offset: f32,
    ) -> Result<Self, ResampleError> {
        if src_extent == 0 || dst_extent == 0 {
            return Err(ResampleError::InvalidExtent(src_extent, dst_extent));
        }

        if !(filter_scale > 0.0 && filter_scale.is_finite()) {
            return Err(ResampleError::InvalidFilterScale(filter_scale));
        }

        const NUDGE: f32 = 0.5;

        let oo_filter_scale = 1.0 / filter_scale;
        let scale = dst_extent as f32 / src_extent as f32;
        let downsampling = scale < 1.0;

        // stretched half width of the filter
        let half_width = (if downsampling {
            filter.support() / scale
        } else {
            filter.support()
        }) * filter_scale;

        let t_scale = oo_filter_scale * if downsampling { scale } else { 1.0 };

        // first pass: the source range of every destination sample
        let mut bounds = try_vec::<Bounds>(dst_extent)?;
        let mut total = 0usize;
        for i in 0..dst_extent {
            // discrete to continuous, scale, back to discrete
            let center = (i as f32 + NUDGE) / scale - NUDGE + src_offset;
            let left = (center - half_width).floor() as isize;
            let right = (center + half_width).ceil() as isize;
            total += (right - left + 1) as usize;
            bounds.push(Bounds {
                center,
                left,
                right,
            });
        }

        let mut pool = try_vec::<Contributor>(total)?;
        let mut spans = try_vec::<Range<usize>>(dst_extent)?;

        // second pass: normalized weights
        for (i, b) in bounds.iter().enumerate() {
            let raw_sum = (b.left..=b.right)
                .map(|j| filter.weight((b.center - j as f32) * t_scale))
                .sum::<f32>();

            if raw_sum == 0.0 || !raw_sum.is_finite() {
                return Err(ResampleError::EmptyContributors(i));
            }

            let norm = 1.0 / raw_sum;
            let start = pool.len();
            let mut kept_sum = 0.0f32;
            let mut max_k = None;
            let mut max_w = f32::MIN;

            for j in b.left..=b.right {
                let weight = filter.weight((b.center - j as f32) * t_scale) * norm;
                if weight == 0.0 {
                    continue;
                }

                pool.push(Contributor {
                    pixel: boundary.map_index(j, src_extent),
                    weight,
                });
                kept_sum += weight;

                if weight > max_w {
                    max_w = weight;
                    max_k = Some(pool.len() - 1);
                }
            }

            let Some(max_k) = max_k else {
                return Err(ResampleError::EmptyContributors(i));
            };

            // push the normalization residual onto the heaviest contributor
            if kept_sum != 1.0 {
                pool[max_k].weight += 1.0 - kept_sum;
            }

            spans.push(start..pool.len());
        }

        log::debug!(
            "contributor list: {} -> {} samples, {} contributors (filter {}, scale {})",
            src_extent,
            dst_extent,
            pool.len(),
            filter.name(),
            filter_scale
        );

        Ok(Self {
            src_extent,
            pool,
            spans,
        })
    }

    /// Create a contributor list from explicit per-sample contributors.
    ///
    /// The weights are taken as they are; it is up to the caller to normalize them.
    ///
    /// # Arguments
    ///
    /// * `src_extent` - The number of source samples along the axis.
    /// * `lists` - The contributors of every destination sample, in order.
    ///
    /// # Errors
    ///
    /// Fails if a destination sample has no contributors or if a contributor points outside
    /// of the source.
    pub fn from_lists(
        src_extent: usize,
        lists: Vec<Vec<Contributor>>,
    ) -> Result<Self, ResampleError> {
        if src_extent == 0 || lists.is_empty() {
            return Err(ResampleError::InvalidExtent(src_extent, lists.len()));
        }

        let total = lists.iter().map(Vec::len).sum();
        let mut pool = try_vec::<Contributor>(total)?;
        let mut spans = try_vec::<Range<usize>>(lists.len())?;

        for (i, list) in lists.into_iter().enumerate() {
            if list.is_empty() {
                return Err(ResampleError::EmptyContributors(i));
            }
            if let Some(c) = list.iter().find(|c| c.pixel >= src_extent) {
                return Err(ResampleError::InvalidSourceIndex(c.pixel, src_extent));
            }
            let start = pool.len();
            pool.extend(list);
            spans.push(start..pool.len());
        }

        Ok(Self {
            src_extent,
            pool,
            spans,
        })
    }

    /// The number of source samples along the axis.
    #[inline]
    pub fn src_extent(&self) -> usize {
        self.src_extent
    }

    /// The number of destination samples along the axis.
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether the list has no destination samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The total number of contributors over all destination samples.
    #[inline]
    pub fn num_contributors(&self) -> usize {
        self.pool.len()
    }

    /// The contributors of destination sample `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&[Contributor]> {
        self.spans.get(i).map(|span| &self.pool[span.clone()])
    }

    /// Iterate over the contributors of every destination sample.
    pub fn iter(&self) -> impl Iterator<Item = &[Contributor]> + '_ {
        self.spans.iter().map(|span| &self.pool[span.clone()])
    }
}

impl Index<usize> for ContributorList {
    type Output = [Contributor];

    fn index(&self, i: usize) -> &Self::Output {
        &self.pool[self.spans[i].clone()]
    }
}
