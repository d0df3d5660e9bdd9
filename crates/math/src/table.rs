//! Stream-compaction lookup table.
//!
//! One processed group is eight 32-bit lanes. Comparing the group against `q`
//! yields an 8-bit acceptance mask; [`CompactionTable::entry`] maps that mask
//! to a byte shuffle which moves the accepted lanes, in order, to the front of
//! the group. Trailing lanes are padding and read as zero.
//!
//! The table is built by a `const fn` and stored in a `static`, so it is fully
//! initialized before any code runs and is shared read-only by every kernel.

use core::simd::u8x32;

/// 32-bit lanes per compaction group (one 256-bit register).
pub const GROUP_LANES: usize = 8;

const GROUP_BYTES: usize = 4 * GROUP_LANES;
const ENTRIES: usize = 1 << GROUP_LANES;

/// Shuffle index that selects no source byte.
const PAD: u8 = 0xFF;

/// Compaction recipe for one acceptance mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactionEntry {
    shuffle: [u8; GROUP_BYTES],
    len: u8,
}

impl CompactionEntry {
    const fn from_mask(mask: u8) -> Self {
        let mut shuffle = [PAD; GROUP_BYTES];
        let mut len = 0;
        let mut lane = 0;
        while lane < GROUP_LANES {
            if mask & (1 << lane) != 0 {
                let mut b = 0;
                while b < 4 {
                    shuffle[4 * len + b] = (4 * lane + b) as u8;
                    b += 1;
                }
                len += 1;
            }
            lane += 1;
        }
        Self {
            shuffle,
            len: len as u8,
        }
    }

    /// Number of accepted lanes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte shuffle over the little-endian image of the group.
    #[inline]
    #[must_use]
    pub const fn shuffle(&self) -> u8x32 {
        u8x32::from_array(self.shuffle)
    }

    /// Source lane of each output lane; `None` for padding.
    #[must_use]
    pub fn lanes(&self) -> [Option<u8>; GROUP_LANES] {
        core::array::from_fn(|i| {
            let idx = self.shuffle[4 * i];
            (idx != PAD).then_some(idx / 4)
        })
    }
}

/// Acceptance mask → compaction recipe, for every 8-bit mask.
pub struct CompactionTable {
    entries: [CompactionEntry; ENTRIES],
}

impl CompactionTable {
    #[must_use]
    pub const fn new() -> Self {
        let mut entries = [CompactionEntry {
            shuffle: [PAD; GROUP_BYTES],
            len: 0,
        }; ENTRIES];
        let mut mask = 0;
        while mask < ENTRIES {
            entries[mask] = CompactionEntry::from_mask(mask as u8);
            mask += 1;
        }
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub const fn entry(&self, mask: u8) -> &CompactionEntry {
        &self.entries[mask as usize]
    }
}

impl Default for CompactionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide table, evaluated at compile time.
pub static COMPACTION_TABLE: CompactionTable = CompactionTable::new();
