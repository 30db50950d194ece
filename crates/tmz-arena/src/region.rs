//! Region handles and layouts.

use crate::config::ArenaConfig;
use crate::error::ArenaError;

/// Size and alignment of a requested region, in bytes.
///
/// # Examples
///
/// ```
/// use tmz_arena::RegionLayout;
///
/// let fields = RegionLayout::array::<f64>(3 * 64 * 64).unwrap();
/// assert_eq!(fields.size(), 3 * 64 * 64 * 8);
/// assert_eq!(fields.align(), 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionLayout {
    size: usize,
    align: usize,
}

impl RegionLayout {
    /// Create a layout, validating size and alignment.
    ///
    /// Alignment must be a power of two no larger than
    /// [`ArenaConfig::WORD_BYTES`]; size must be non-zero.
    pub fn new(size: usize, align: usize) -> Result<Self, ArenaError> {
        if !align.is_power_of_two() || align > ArenaConfig::WORD_BYTES {
            return Err(ArenaError::UnsupportedAlignment { align });
        }
        if size == 0 {
            return Err(ArenaError::ZeroSized);
        }
        Ok(Self { size, align })
    }

    /// Layout for `count` contiguous values of `T`.
    pub fn array<T>(count: usize) -> Result<Self, ArenaError> {
        let size = count
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(ArenaError::CapacityExceeded {
                requested: usize::MAX,
                available: 0,
            })?;
        Self::new(size, std::mem::align_of::<T>())
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes.
    pub fn align(&self) -> usize {
        self.align
    }
}

/// A reserved, disjoint span `[offset, offset + len)` of one arena.
///
/// Handles are plain values. They carry the identity and epoch of the
/// arena that issued them, so a handle from another arena, or from before
/// a [`clear`](crate::MemoryArena::clear), resolves to `None` instead of
/// aliasing unrelated memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub(crate) arena_id: u32,
    pub(crate) epoch: u32,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Region {
    /// Byte offset from the arena base.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Regions are never empty; provided for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the region.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether two regions share any byte.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two_alignment() {
        assert_eq!(
            RegionLayout::new(16, 3),
            Err(ArenaError::UnsupportedAlignment { align: 3 })
        );
    }

    #[test]
    fn rejects_alignment_above_word() {
        assert!(RegionLayout::new(16, 16).is_err());
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(RegionLayout::new(0, 8), Err(ArenaError::ZeroSized));
        assert!(RegionLayout::array::<f64>(0).is_err());
    }

    #[test]
    fn array_layout_for_pixels() {
        let l = RegionLayout::array::<u32>(10).unwrap();
        assert_eq!(l.size(), 40);
        assert_eq!(l.align(), 4);
    }

    #[test]
    fn overlap_detection() {
        let a = Region {
            arena_id: 0,
            epoch: 0,
            offset: 0,
            len: 16,
        };
        let b = Region { offset: 16, ..a };
        let c = Region { offset: 8, ..a };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
