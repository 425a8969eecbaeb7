use alloc::collections::BTreeMap;

/// Sparse paged bitset over step indices ("BA").
///
/// Steps are grouped into 64-wide pages; only pages with at least one
/// live bit are stored. The addressable step range (~2^60) is far
/// larger than any practical payload, so a dense bit array is never
/// allocated. Cardinality is cached so membership accounting is O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancySet {
    pages: BTreeMap<u64, u64>,
    len: u64,
}

#[inline]
fn split(step: u64) -> (u64, u64) {
    (step >> 6, 1u64 << (step & 63))
}

impl OccupancySet {
    pub fn new() -> Self {
        Self {
            pages: BTreeMap::new(),
            len: 0,
        }
    }

    /// Marks `step` as materialized. Returns `false` if it already was.
    pub fn insert(&mut self, step: u64) -> bool {
        let (page, mask) = split(step);
        let word = self.pages.entry(page).or_insert(0);
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        self.len += 1;
        true
    }

    /// Clears `step`, dropping its page once empty. Returns `false`
    /// when the bit was not set.
    pub fn remove(&mut self, step: u64) -> bool {
        let (page, mask) = split(step);
        match self.pages.get_mut(&page) {
            Some(word) if *word & mask != 0 => {
                *word &= !mask;
                if *word == 0 {
                    self.pages.remove(&page);
                }
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, step: u64) -> bool {
        let (page, mask) = split(step);
        self.pages.get(&page).map_or(false, |word| word & mask != 0)
    }

    /// Number of materialized steps.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live `(page, mask)` pairs in ascending page order.
    pub fn pages(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.pages.iter().map(|(&page, &mask)| (page, mask))
    }

    /// Rebuilds a set from `(page, mask)` pairs. Returns `None` on a
    /// duplicate page or an all-zero mask, both of which indicate a
    /// malformed source.
    pub fn from_pages<I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut set = Self::new();
        for (page, mask) in pairs {
            if mask == 0 {
                return None;
            }
            if set.pages.insert(page, mask).is_some() {
                return None;
            }
            set.len += u64::from(mask.count_ones());
        }
        Some(set)
    }
}
