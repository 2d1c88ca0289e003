/// Boundary policy used when a filter reaches past the edge of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryOp {
    /// Repeat the outermost sample.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Clamp,

    /// Mirror the samples across the edge, starting with the edge sample itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Wrap around to the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl BoundaryOp {
    #[inline]
    fn clamp(j: isize, extent: usize) -> usize {
        j.clamp(0, extent as isize - 1) as usize
    }

    // a single reflection, clamped in case the filter is wider than the extent
    #[inline]
    fn reflect(j: isize, extent: usize) -> usize {
        let len = extent as isize;
        let n = if j < 0 { -j - 1 } else { 2 * len - j - 1 };
        Self::clamp(n, extent)
    }

    #[inline]
    fn wrap(j: isize, extent: usize) -> usize {
        let len = extent as isize;
        ((j % len + len) % len) as usize
    }

    /// Maps index `j` to a valid index i.e. within `[0, extent)` according to the policy.
    ///
    /// # Arguments
    ///
    /// * `j` - The (possibly out-of-range) source index.
    /// * `extent` - The number of samples along the axis. Must be positive.
    ///
    /// # Returns
    ///
    /// A valid index within `[0, extent)`. In-range indices are returned unchanged.
    #[inline]
    pub fn map_index(&self, j: isize, extent: usize) -> usize {
        debug_assert!(extent > 0);
        if j >= 0 && (j as usize) < extent {
            return j as usize;
        }
        match self {
            BoundaryOp::Clamp => Self::clamp(j, extent),
            BoundaryOp::Reflect => Self::reflect(j, extent),
            BoundaryOp::Wrap => Self::wrap(j, extent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_index_edges() {
        assert_eq!(BoundaryOp::Clamp.map_index(-1, 4), 0);
        assert_eq!(BoundaryOp::Clamp.map_index(4, 4), 3);
        assert_eq!(BoundaryOp::Reflect.map_index(-1, 4), 0);
        assert_eq!(BoundaryOp::Reflect.map_index(4, 4), 3);
        assert_eq!(BoundaryOp::Wrap.map_index(-1, 4), 3);
        assert_eq!(BoundaryOp::Wrap.map_index(4, 4), 0);
    }

    #[test]
    fn test_map_index_in_range() {
        for op in [BoundaryOp::Clamp, BoundaryOp::Reflect, BoundaryOp::Wrap] {
            for j in 0..5 {
                assert_eq!(op.map_index(j, 5), j as usize);
            }
        }
    }

    #[test]
    fn test_map_index_far() {
        assert_eq!(BoundaryOp::Clamp.map_index(-100, 4), 0);
        assert_eq!(BoundaryOp::Clamp.map_index(100, 4), 3);

        assert_eq!(BoundaryOp::Reflect.map_index(-3, 4), 2);
        assert_eq!(BoundaryOp::Reflect.map_index(6, 4), 1);
        // wider than the extent, falls back to clamping
        assert_eq!(BoundaryOp::Reflect.map_index(-10, 4), 3);
        assert_eq!(BoundaryOp::Reflect.map_index(12, 4), 0);

        assert_eq!(BoundaryOp::Wrap.map_index(-5, 4), 3);
        assert_eq!(BoundaryOp::Wrap.map_index(-8, 4), 0);
        assert_eq!(BoundaryOp::Wrap.map_index(9, 4), 1);
    }

    #[test]
    fn test_map_index_single_sample() {
        for op in [BoundaryOp::Clamp, BoundaryOp::Reflect, BoundaryOp::Wrap] {
            assert_eq!(op.map_index(-2, 1), 0);
            assert_eq!(op.map_index(3, 1), 0);
        }
    }
}
