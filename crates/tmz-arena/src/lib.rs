//! Fixed-capacity memory arena for the TMz solver.
//!
//! A [`MemoryArena`] is one flat, zero-initialised byte buffer allocated
//! once at construction. Consumers reserve disjoint regions from it by
//! size and alignment; each reservation returns a [`Region`] handle
//! (offset + length) that is later used to obtain typed views.
//!
//! ```text
//! MemoryArena (capacity fixed at construction)
//! ├── Region 0: solver state (f64 fields, coefficients, edge history)
//! ├── Region 1: host image buffer (u32 RGBA pixels)
//! └── ...free space up to capacity
//! ```
//!
//! Regions are bump-allocated and never move, so the offset a host reads
//! once stays valid for the arena's lifetime (or until [`MemoryArena::clear`]).
//! Typed access goes through `bytemuck`, so this crate needs no `unsafe`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod region;

pub use arena::MemoryArena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use region::{Region, RegionLayout};
