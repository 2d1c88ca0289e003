use crate::{contrib::ContributorList, PlaneSize};

/// The order in which the two axes are resampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// Rows are reduced horizontally as they arrive, then combined vertically.
    XThenY,
    /// Raw rows are combined vertically first, the horizontal pass runs on output rows.
    YThenX,
}

/// The outcome of axis order planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPlan {
    /// The chosen order.
    pub order: AxisOrder,
    /// The width of the rows held in the scanline buffer.
    pub intermediate_width: usize,
    /// Weighted multiply-accumulate count of the X-then-Y order.
    pub xy_cost: u64,
    /// Weighted multiply-accumulate count of the Y-then-X order.
    pub yx_cost: u64,
}

impl AxisPlan {
    /// Plan the axis order from the contributor lists of both axes.
    ///
    /// # Arguments
    ///
    /// * `clist_x` - The horizontal contributor list.
    /// * `clist_y` - The vertical contributor list.
    /// * `src_size` - The size of the source plane.
    /// * `dst_size` - The size of the destination plane.
    /// * `subrect_width` - The width of the destination rows actually produced.
    pub fn new(
        clist_x: &ContributorList,
        clist_y: &ContributorList,
        src_size: PlaneSize,
        dst_size: PlaneSize,
        subrect_width: usize,
    ) -> Self {
        let plan = choose_order(
            clist_x.num_contributors() as u64,
            clist_y.num_contributors() as u64,
            src_size,
            dst_size,
            subrect_width,
        );

        log::debug!(
            "axis plan: {:?}, intermediate width {} (xy cost {}, yx cost {})",
            plan.order,
            plan.intermediate_width,
            plan.xy_cost,
            plan.yx_cost
        );

        plan
    }

    /// Whether the horizontal pass is deferred until after the vertical one.
    #[inline]
    pub fn delay_x(&self) -> bool {
        self.order == AxisOrder::YThenX
    }
}

/// Pick the cheaper axis order given the contributor counts of both axes.
///
/// Vertical operations are weighted by 4/3 since they touch more cache lines than the
/// horizontal ones. Ties go to the order buffering the narrower rows.
pub fn choose_order(
    x_ops: u64,
    y_ops: u64,
    src_size: PlaneSize,
    dst_size: PlaneSize,
    subrect_width: usize,
) -> AxisPlan {
    let (src_w, src_h) = (src_size.width as u64, src_size.height as u64);
    let (dst_w, dst_h) = (dst_size.width as u64, dst_size.height as u64);

    let xy_cost = x_ops * src_h + (4 * y_ops * dst_w) / 3;
    let yx_cost = (4 * y_ops * src_w) / 3 + x_ops * dst_h;

    let delay_x = xy_cost > yx_cost || (xy_cost == yx_cost && src_w < dst_w);

    if delay_x {
        AxisPlan {
            order: AxisOrder::YThenX,
            intermediate_width: src_size.width,
            xy_cost,
            yx_cost,
        }
    } else {
        AxisPlan {
            order: AxisOrder::XThenY,
            intermediate_width: subrect_width,
            xy_cost,
            yx_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{border::BoundaryOp, error::ResampleError, filter::find_filter};

    fn size(width: usize, height: usize) -> PlaneSize {
        PlaneSize { width, height }
    }

    #[test]
    fn test_cost_model() {
        // 8 ops on x, 12 on y
        let plan = choose_order(8, 12, size(4, 6), size(2, 3), 2);
        assert_eq!(plan.xy_cost, 8 * 6 + (4 * 12 * 2) / 3);
        assert_eq!(plan.yx_cost, (4 * 12 * 4) / 3 + 8 * 3);
        assert_eq!(plan.xy_cost, 80);
        assert_eq!(plan.yx_cost, 88);
        assert_eq!(plan.order, AxisOrder::XThenY);
        assert_eq!(plan.intermediate_width, 2);
        assert!(!plan.delay_x());
    }

    #[test]
    fn test_prefers_yx_when_cheaper() {
        // narrow and tall source stretched horizontally, shrunk vertically
        let plan = choose_order(2000, 1000, size(10, 1000), size(1000, 10), 1000);
        assert_eq!(plan.xy_cost, 3_333_333);
        assert_eq!(plan.yx_cost, 33_333);
        assert_eq!(plan.order, AxisOrder::YThenX);
        assert_eq!(plan.intermediate_width, 10);
        assert!(plan.delay_x());
    }

    #[test]
    fn test_tie_prefers_narrow_buffer() {
        // equal costs, the source is narrower so it gets buffered
        let plan = choose_order(4, 3, size(2, 2), size(4, 4), 4);
        assert_eq!(plan.xy_cost, plan.yx_cost);
        assert_eq!(plan.order, AxisOrder::YThenX);
        assert_eq!(plan.intermediate_width, 2);

        // equal costs, the destination is narrower
        let plan = choose_order(4, 3, size(4, 4), size(2, 2), 2);
        assert_eq!(plan.xy_cost, plan.yx_cost);
        assert_eq!(plan.order, AxisOrder::XThenY);
        assert_eq!(plan.intermediate_width, 2);
    }

    #[test]
    fn test_plan_from_lists() -> Result<(), ResampleError> {
        let filter = find_filter("box").unwrap();
        let clist_x = ContributorList::build(4, 4, BoundaryOp::Clamp, filter, 1.0, 0.0)?;
        let clist_y = ContributorList::build(4, 4, BoundaryOp::Clamp, filter, 1.0, 0.0)?;
        let plan = AxisPlan::new(&clist_x, &clist_y, size(4, 4), size(4, 4), 4);
        assert_eq!(plan.xy_cost, 37);
        assert_eq!(plan.yx_cost, 37);
        assert_eq!(plan.order, AxisOrder::XThenY);
        Ok(())
    }
}
