//! The fixed-capacity arena.

use std::sync::atomic::{AtomicU32, Ordering};

use bytemuck::Pod;
use indexmap::IndexMap;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::region::{Region, RegionLayout};

/// Counter for unique arena identities.
static ARENA_COUNTER: AtomicU32 = AtomicU32::new(1);

/// One flat byte buffer shared by the solver and host buffers.
///
/// Storage is a boxed slice of `u64` words allocated once in
/// [`MemoryArena::new`], which gives every region offset that is a
/// multiple of its alignment a correctly aligned address for `f64` and
/// `u32` views. Reservations are bump-allocated in increasing offset
/// order and are disjoint by construction.
pub struct MemoryArena {
    id: u32,
    epoch: u32,
    words: Box<[u64]>,
    /// Next free byte.
    cursor: usize,
    /// Maps region offset to its handle, in reservation order.
    regions: IndexMap<usize, Region>,
}

impl MemoryArena {
    /// Allocate a zeroed arena of the configured capacity.
    pub fn new(config: ArenaConfig) -> Self {
        let words = vec![0u64; config.usable_bytes() / ArenaConfig::WORD_BYTES];
        Self {
            id: ARENA_COUNTER.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
            words: words.into_boxed_slice(),
            cursor: 0,
            regions: IndexMap::new(),
        }
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.words.len() * ArenaConfig::WORD_BYTES
    }

    /// Bytes consumed by reservations, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Bytes still free for reservations.
    pub fn available(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Bytes needed to reserve `layout` at the current cursor, padding included.
    pub fn required_for(&self, layout: RegionLayout) -> usize {
        let start = align_up(self.cursor, layout.align());
        start - self.cursor + layout.size()
    }

    /// Reserve a zeroed region directly after the previous reservation.
    pub fn reserve(&mut self, layout: RegionLayout) -> Result<Region, ArenaError> {
        let offset = align_up(self.cursor, layout.align());
        let end = offset.checked_add(layout.size());
        let end = match end {
            Some(end) if end <= self.capacity() => end,
            _ => {
                return Err(ArenaError::CapacityExceeded {
                    requested: self.required_for(layout),
                    available: self.available(),
                })
            }
        };

        let region = Region {
            arena_id: self.id,
            epoch: self.epoch,
            offset,
            len: layout.size(),
        };
        self.bytes_all_mut()[offset..end].fill(0);
        self.regions.insert(offset, region);
        self.cursor = end;
        Ok(region)
    }

    /// Drop every reservation and zero the storage.
    ///
    /// Handles issued before the call no longer resolve.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.regions.clear();
        self.cursor = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Whether `region` was issued by this arena since the last clear.
    pub fn contains(&self, region: &Region) -> bool {
        region.arena_id == self.id
            && region.epoch == self.epoch
            && self.regions.get(&region.offset) == Some(region)
    }

    /// Look up the region that starts at `offset`.
    pub fn region_at(&self, offset: usize) -> Result<Region, ArenaError> {
        self.regions
            .get(&offset)
            .copied()
            .ok_or(ArenaError::UnknownRegion { offset })
    }

    /// All live regions in reservation (and therefore offset) order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of live regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Base address of the storage, for hosts that read buffers in place.
    ///
    /// The pointer stays valid until the arena is dropped. Reading through
    /// it while a `&mut` view is alive is the caller's responsibility.
    pub fn base_ptr(&self) -> *const u8 {
        self.words.as_ptr().cast()
    }

    /// Raw bytes of a region.
    pub fn bytes(&self, region: &Region) -> Option<&[u8]> {
        if !self.contains(region) {
            return None;
        }
        Some(&self.bytes_all()[region.offset..region.end()])
    }

    /// Mutable raw bytes of a region.
    pub fn bytes_mut(&mut self, region: &Region) -> Option<&mut [u8]> {
        if !self.contains(region) {
            return None;
        }
        Some(&mut self.bytes_all_mut()[region.offset..region.end()])
    }

    /// Typed view of a region. `None` if the handle is stale or the region
    /// is not a whole, aligned number of `T`.
    pub fn view<T: Pod>(&self, region: &Region) -> Option<&[T]> {
        bytemuck::try_cast_slice(self.bytes(region)?).ok()
    }

    /// Mutable typed view of a region.
    pub fn view_mut<T: Pod>(&mut self, region: &Region) -> Option<&mut [T]> {
        bytemuck::try_cast_slice_mut(self.bytes_mut(region)?).ok()
    }

    /// Borrow one region for reading and another, disjoint one for writing.
    ///
    /// Used to rasterise the solver's fields into a host pixel buffer that
    /// lives in the same arena.
    pub fn split_views<R: Pod, W: Pod>(
        &mut self,
        read: &Region,
        write: &Region,
    ) -> Option<(&[R], &mut [W])> {
        if !self.contains(read) || !self.contains(write) || read.overlaps(write) {
            return None;
        }
        let bytes = self.bytes_all_mut();
        let (r, w): (&[u8], &mut [u8]) = if read.offset < write.offset {
            let (lo, hi) = bytes.split_at_mut(write.offset);
            (&lo[read.offset..read.end()], &mut hi[..write.len])
        } else {
            let (lo, hi) = bytes.split_at_mut(read.offset);
            (&hi[..read.len], &mut lo[write.offset..write.end()])
        };
        let r = bytemuck::try_cast_slice(r).ok()?;
        let w = bytemuck::try_cast_slice_mut(w).ok()?;
        Some((r, w))
    }

    fn bytes_all(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    fn bytes_all_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.words)
    }
}

impl std::fmt::Debug for MemoryArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryArena")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("used", &self.cursor)
            .field("regions", &self.regions.len())
            .finish()
    }
}

fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}
