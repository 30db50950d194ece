//! C ABI export table for the TMz solver.
//!
//! Every simulator lives behind an opaque `u64` handle. Exports return a
//! [`TmzStatus`](status::TmzStatus) code (0 on success, negative on error)
//! and write results through caller-supplied out-pointers. Panics are
//! caught at the boundary and reported as `Panicked`; no panic unwinds
//! into the host.
//!
//! This is the only crate in the workspace that contains `unsafe` code,
//! and only for dereferencing host pointers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run `$body` under `catch_unwind`; a panic becomes `TmzStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(_) => $crate::status::TmzStatus::Panicked as i32,
        }
    };
}

/// Like `ffi_guard!` for exports that return a plain value; a panic yields
/// `$default`.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)).unwrap_or($default)
    };
}

/// Lock a mutex or return `TmzStatus::InternalError` from the enclosing
/// closure if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::TmzStatus::InternalError as i32,
        }
    };
}

pub mod command;
pub mod config;
mod handle;
pub mod metrics;
pub mod simulator;
pub mod status;
pub mod types;

pub use status::TmzStatus;
