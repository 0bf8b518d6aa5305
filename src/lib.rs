//! Fingerprint similarity search core.
//!
//! This crate is the numeric engine behind a cheminformatics
//! similarity-search system operating on fixed-width binary fingerprints.
//! It does not parse any textual fingerprint format and does not expose a
//! C calling convention; both are the job of a thin host binding built on
//! top of this crate.
//!
//! # Building an arena and searching it
//!
//! ```
//! use fpsim::arena::Arena;
//! use fpsim::results::{ResultSet, Ordering};
//! use fpsim::search;
//!
//! let width = 8;
//! let stride = 1;
//! let targets: &[u8] = &[0x0F, 0x07, 0x00];
//! let arena = Arena::build(width, stride, targets, 3).unwrap();
//!
//! let query: &[u8] = &[0x0F];
//! let mut results = ResultSet::new(1);
//! search::threshold_tanimoto_arena(
//!     0.5, width,
//!     stride, query, 0..1,
//!     arena.stride(), arena.bytes(), 0..arena.len(),
//!     Some(arena.popcount_table()),
//!     &mut results,
//! ).unwrap();
//! results.row_mut(0).reorder(Ordering::DecreasingScore).unwrap();
//! assert_eq!(results.row(0).len(), 2);
//! ```

pub mod arena;
pub mod bits;
pub mod dispatch;
pub mod errors;
pub mod kernel;
pub mod options;
pub mod parallel;
pub mod results;
pub mod search;
pub mod threads;

pub use errors::{Error, Result};

/// Crate version string, mirroring the external `version()` operation.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Human-readable description of an error code (spec.md §6 `strerror`).
pub fn strerror(code: i32) -> &'static str {
    match code {
        0 => "success",
        1 => "a parameter passed to this function was invalid",
        2 => "memory allocation failed",
        3 => "line uses unsupported whitespace",
        4 => "record is missing a fingerprint field",
        5 => "fingerprint field could not be decoded",
        6 => "fingerprint length does not match the declared bit width",
        7 => "record is missing an identifier field",
        8 => "identifier field could not be decoded",
        9 => "record is missing a terminating newline",
        10 => "requested kernel does not support this alignment/stride combination",
        11 => "unknown reorder ordering name",
        _ => "unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!version().is_empty());
    }

    #[test]
    fn strerror_covers_known_codes() {
        assert_eq!(strerror(0), "success");
        assert_eq!(strerror(999), "unknown error code");
    }
}
