//! Arena configuration parameters.

/// Configuration for a [`MemoryArena`](crate::MemoryArena).
///
/// Capacity is fixed at construction; the arena never grows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Total arena size in bytes.
    ///
    /// Rounded down to a multiple of [`ArenaConfig::WORD_BYTES`] when the
    /// arena is built. Default: 512 pages of 64 KiB (32 MiB).
    pub capacity_bytes: usize,
}

impl ArenaConfig {
    /// Size of one page, matching a WebAssembly linear-memory page.
    pub const PAGE_BYTES: usize = 64 * 1024;

    /// Default page count.
    pub const DEFAULT_PAGES: usize = 512;

    /// Storage word size; also the largest supported region alignment.
    pub const WORD_BYTES: usize = std::mem::size_of::<u64>();

    /// Create a config with an explicit byte capacity.
    pub fn new(capacity_bytes: usize) -> Self {
        Self { capacity_bytes }
    }

    /// Create a config sized in 64 KiB pages.
    pub fn pages(count: usize) -> Self {
        Self::new(count.saturating_mul(Self::PAGE_BYTES))
    }

    /// Capacity after rounding down to whole storage words.
    pub fn usable_bytes(&self) -> usize {
        self.capacity_bytes - self.capacity_bytes % Self::WORD_BYTES
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::pages(Self::DEFAULT_PAGES)
    }
}
