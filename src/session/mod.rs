//! Live editing session over one profile document.
//!
//! # Data Flow
//! ```text
//! load(document)
//!     → version += 1, snapshot published
//!     → catalog fetch (timeout bounded)
//!     → version still current?
//!         ├─ no  → result discarded, Ok(None)
//!         └─ yes → project, publish pruned document, Ok(Some(tree))
//!
//! tree edits (presentation layer)
//!     → apply_edit / remove_object / add_objects_by_id / set_ota_strategy
//!     → new document published under the same version
//!
//! publishable_document()
//!     → validate_document → Ok(document) | Err(issues)
//! ```
//!
//! # Design Decisions
//! - Readers get an `Arc` snapshot and never block writers
//! - A fetch result is tagged with the version that requested it
//! - Fetch failures leave the published document untouched

pub mod editor;

pub use editor::{DocumentSnapshot, ProfileSession, SessionError};
