//! # statuswatch-types
//!
//! Core types shared by the statuswatch crates: the classified status
//! [`Level`], the per-poll [`StatusSnapshot`] and the [`HistoryEntry`] that
//! records a transition between levels.
//!
//! ## Features
//!
//! - `std` (default): Standard library support (wall-clock timestamps)
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use statuswatch_types::{Level, StatusSnapshot, UnknownStatusPolicy};
//!
//! let snapshot = StatusSnapshot::with_timestamp("  WARNING ", "disk almost full", 1_703_160_000_000);
//! assert_eq!(snapshot.status(), "warning");
//!
//! let level = Level::classify(snapshot.status(), UnknownStatusPolicy::TreatAsOk);
//! assert_eq!(level, Level::Warning);
//! assert_eq!(level.to_string(), "WARNING");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod entry;
mod level;
mod snapshot;

pub use entry::*;
pub use level::*;
pub use snapshot::*;
