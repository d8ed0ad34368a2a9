//! Path addressing subsystem.
//!
//! # Data Flow
//! ```text
//! "/3/0/1" (persisted string)
//!     → codec.rs (lenient parse into ResourcePath)
//!     → transform/* (resolve object → instance → resource)
//!     → codec.rs (format back to canonical string)
//!     → sorter.rs (natural ordering for every persisted collection)
//! ```
//!
//! # Design Decisions
//! - Parsing never fails: malformed numeric segments truncate the path
//! - `ResourcePath` ordering is the natural path order, so ordered maps
//!   keyed by paths are already canonical
//! - Ids are 16-bit, matching the LWM2M addressing range

pub mod codec;
pub mod sorter;

pub use codec::{Granularity, ResourcePath};
pub use sorter::{compare, sort_paths};
