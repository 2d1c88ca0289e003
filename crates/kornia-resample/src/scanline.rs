use crate::{contrib::ContributorList, error::ResampleError};

/// Default number of slots of the scanline buffer.
pub const DEFAULT_SCAN_BUFFER_CAPACITY: usize = 8192;

#[derive(Debug, Default)]
struct ScanlineSlot {
    row: Option<usize>,
    remaining: u32,
    data: Vec<f32>,
}

/// A fixed capacity pool of buffered source rows.
///
/// Each slot holds one source row (raw, or already reduced horizontally) together with the
/// number of destination rows that still need it. A slot is freed when that count drops to
/// zero. Slot memory is allocated on first use and reused afterwards.
#[derive(Debug)]
pub struct ScanlineBuffer {
    capacity: usize,
    row_width: usize,
    slots: Vec<ScanlineSlot>,
    // source row -> slot holding it
    slot_of_row: Vec<Option<usize>>,
    // how many destination rows reference each source row
    use_counts: Vec<u32>,
    occupied: usize,
    high_water: usize,
}

impl ScanlineBuffer {
    /// Create a new scanline buffer.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The maximum number of rows alive at the same time.
    /// * `row_width` - The number of samples of a buffered row.
    /// * `clist_y` - The vertical contributor list, used to count the uses of each source row.
    pub fn new(
        capacity: usize,
        row_width: usize,
        clist_y: &ContributorList,
    ) -> Result<Self, ResampleError> {
        let src_height = clist_y.src_extent();

        let mut use_counts = Vec::new();
        use_counts.try_reserve_exact(src_height)?;
        use_counts.resize(src_height, 0u32);
        for contribs in clist_y.iter() {
            for c in contribs {
                use_counts[c.pixel] += 1;
            }
        }

        let mut slot_of_row = Vec::new();
        slot_of_row.try_reserve_exact(src_height)?;
        slot_of_row.resize(src_height, None);

        Ok(Self {
            capacity,
            row_width,
            slots: Vec::new(),
            slot_of_row,
            use_counts,
            occupied: 0,
            high_water: 0,
        })
    }

    /// The number of destination rows referencing source row `row`.
    #[inline]
    pub fn initial_use_count(&self, row: usize) -> u32 {
        self.use_counts.get(row).copied().unwrap_or(0)
    }

    /// Find a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`ResampleError::ScanBufferFull`] when all `capacity` slots are occupied.
    pub fn acquire_free_slot(&mut self) -> Result<usize, ResampleError> {
        if let Some(i) = self.slots.iter().position(|s| s.row.is_none()) {
            return Ok(i);
        }

        if self.slots.len() >= self.capacity {
            return Err(ResampleError::ScanBufferFull(self.capacity));
        }

        self.slots.try_reserve(1)?;
        self.slots.push(ScanlineSlot::default());
        Ok(self.slots.len() - 1)
    }

    /// Tag `slot` with source row `row` and return its samples for writing.
    pub fn store(&mut self, slot: usize, row: usize) -> Result<&mut [f32], ResampleError> {
        debug_assert!(self.use_counts[row] > 0);

        let row_width = self.row_width;
        let remaining = self.use_counts[row];
        let s = &mut self.slots[slot];
        debug_assert!(s.row.is_none());

        if s.data.len() != row_width {
            s.data.try_reserve_exact(row_width)?;
            s.data.resize(row_width, 0.0);
        }

        s.row = Some(row);
        s.remaining = remaining;
        self.slot_of_row[row] = Some(slot);

        self.occupied += 1;
        self.high_water = self.high_water.max(self.occupied);

        Ok(self.slots[slot].data.as_mut_slice())
    }

    /// The slot holding source row `row`, if it is buffered.
    #[inline]
    pub fn find(&self, row: usize) -> Option<usize> {
        self.slot_of_row.get(row).copied().flatten()
    }

    /// The samples held by `slot`.
    #[inline]
    pub fn data(&self, slot: usize) -> &[f32] {
        &self.slots[slot].data
    }

    /// Consume one use of the row held by `slot`, freeing the slot after the last one.
    pub fn release(&mut self, slot: usize) {
        let s = &mut self.slots[slot];
        let Some(row) = s.row else {
            return;
        };

        s.remaining = s.remaining.saturating_sub(1);
        if s.remaining == 0 {
            s.row = None;
            self.slot_of_row[row] = None;
            self.occupied -= 1;
            log::trace!("scanline slot {} freed (source row {})", slot, row);
        }
    }

    /// The maximum number of rows alive at the same time.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of samples of a buffered row.
    #[inline]
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// The number of slots currently holding a row.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// The largest number of slots ever occupied at the same time.
    #[inline]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// The number of slots with allocated memory.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrib::Contributor;

    fn contrib(pixel: usize, weight: f32) -> Contributor {
        Contributor { pixel, weight }
    }

    // three destination rows over four source rows, row 3 is never used
    fn clist_y() -> Result<ContributorList, ResampleError> {
        ContributorList::from_lists(
            4,
            vec![
                vec![contrib(0, 0.5), contrib(1, 0.5)],
                vec![contrib(1, 1.0)],
                vec![contrib(1, 0.5), contrib(2, 0.5)],
            ],
        )
    }

    #[test]
    fn test_use_counts() -> Result<(), ResampleError> {
        let buf = ScanlineBuffer::new(4, 2, &clist_y()?)?;
        assert_eq!(buf.initial_use_count(0), 1);
        assert_eq!(buf.initial_use_count(1), 3);
        assert_eq!(buf.initial_use_count(2), 1);
        assert_eq!(buf.initial_use_count(3), 0);
        assert_eq!(buf.initial_use_count(4), 0);
        Ok(())
    }

    #[test]
    fn test_store_find_release() -> Result<(), ResampleError> {
        let mut buf = ScanlineBuffer::new(4, 2, &clist_y()?)?;
        assert_eq!(buf.allocated(), 0);

        let slot = buf.acquire_free_slot()?;
        buf.store(slot, 1)?.copy_from_slice(&[1.0, 2.0]);
        assert_eq!(buf.find(1), Some(slot));
        assert_eq!(buf.find(0), None);
        assert_eq!(buf.data(slot), &[1.0, 2.0]);
        assert_eq!(buf.occupied(), 1);

        // row 1 has three uses
        buf.release(slot);
        buf.release(slot);
        assert_eq!(buf.find(1), Some(slot));
        buf.release(slot);
        assert_eq!(buf.find(1), None);
        assert_eq!(buf.occupied(), 0);

        // the freed slot is reused without a new allocation
        let again = buf.acquire_free_slot()?;
        assert_eq!(again, slot);
        buf.store(again, 2)?;
        assert_eq!(buf.allocated(), 1);
        assert_eq!(buf.high_water(), 1);
        Ok(())
    }

    #[test]
    fn test_capacity_exhausted() -> Result<(), ResampleError> {
        let mut buf = ScanlineBuffer::new(2, 2, &clist_y()?)?;
        let a = buf.acquire_free_slot()?;
        buf.store(a, 0)?;
        let b = buf.acquire_free_slot()?;
        buf.store(b, 1)?;
        assert_eq!(buf.acquire_free_slot(), Err(ResampleError::ScanBufferFull(2)));

        buf.release(a);
        assert_eq!(buf.acquire_free_slot()?, a);
        Ok(())
    }
}
