use alloc::collections::BTreeMap;
use static_assertions::assert_eq_size;

/// One materialized trace-plane cell: the planar coordinate it sits at
/// and its current 64-bit counter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneCell {
    pub pidx: u32,
    pub value: u64,
}

assert_eq_size!(PlaneCell, [u8; 16]);

/// A sparse trace plane.
///
/// Cells are addressed by `(pidx, k)` but keyed by the depth index `k`
/// alone: within one lane every depth belongs to at most one step, so
/// a depth can hold at most one planar coordinate. Absent depths are
/// at baseline, which is what makes the map double as the depth→pidx
/// index the decoder peels from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TracePlane {
    cells: BTreeMap<u64, PlaneCell>,
}

impl TracePlane {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Materializes depth `k` at `pidx` with `value`. Returns `false`
    /// if the depth is already occupied.
    pub fn occupy(&mut self, k: u64, pidx: u32, value: u64) -> bool {
        if self.cells.contains_key(&k) {
            return false;
        }
        self.cells.insert(k, PlaneCell { pidx, value });
        true
    }

    /// Removes and returns the cell at depth `k`, restoring that depth
    /// to baseline.
    pub fn take(&mut self, k: u64) -> Option<PlaneCell> {
        self.cells.remove(&k)
    }

    pub fn get(&self, k: u64) -> Option<&PlaneCell> {
        self.cells.get(&k)
    }

    /// Number of cells away from baseline.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Materialized `(k, cell)` pairs in ascending depth order.
    pub fn cells(&self) -> impl Iterator<Item = (u64, PlaneCell)> + '_ {
        self.cells.iter().map(|(&k, &cell)| (k, cell))
    }

    /// Rebuilds a plane from `(k, cell)` pairs. Returns `None` on a
    /// duplicate depth.
    pub fn from_cells<I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u64, PlaneCell)>,
    {
        let mut plane = Self::new();
        for (k, cell) in pairs {
            if plane.cells.insert(k, cell).is_some() {
                return None;
            }
        }
        Some(plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn occupy_take_restores_baseline() {
        let mut plane = TracePlane::new();
        assert!(plane.occupy(0, 65, 0x42));
        assert!(plane.occupy(9, 512, 1));
        assert_eq!(plane.len(), 2);

        // A depth belongs to at most one step.
        assert!(!plane.occupy(0, 99, 7));

        let cell = plane.take(0).unwrap();
        assert_eq!(cell, PlaneCell { pidx: 65, value: 0x42 });
        assert!(plane.take(0).is_none());
        assert_eq!(plane.len(), 1);

        plane.take(9).unwrap();
        assert!(plane.is_empty());
    }

    #[test]
    fn cell_iteration_round_trips() {
        let mut plane = TracePlane::new();
        plane.occupy(3, 1279, 256);
        plane.occupy(1, 512, 1);
        let pairs: Vec<_> = plane.cells().collect();
        // Ascending depth order.
        assert_eq!(pairs[0].0, 1);
        assert_eq!(pairs[1].0, 3);
        let rebuilt = TracePlane::from_cells(pairs).unwrap();
        assert_eq!(rebuilt, plane);
    }

    #[test]
    fn from_cells_rejects_duplicate_depths() {
        let dup = [
            (5, PlaneCell { pidx: 1, value: 2 }),
            (5, PlaneCell { pidx: 3, value: 4 }),
        ];
        assert!(TracePlane::from_cells(dup).is_none());
    }
}
