//! Document ⇄ tree transformation engine.
//!
//! # Data Flow
//! ```text
//! ObjectTemplate[] + ObserveAttr
//!     → expander.rs  (synthesize referenced non-zero instances)
//!     → projector.rs (flags, overrides, validated key names onto nodes)
//!     → ProfileTree  (edited in place by the presentation layer)
//!     → flattener.rs (rebuild the five path-keyed fields, canonical order)
//!
//! Object deletion:
//!     remover.rs  (drop the subtree + purge every path under its key)
//! Object addition:
//!     merge.rs    (append newly fetched templates, existing nodes untouched)
//! ```
//!
//! # Design Decisions
//! - Every transform is a pure, finite traversal; nothing here can fail
//! - Unresolved paths are skipped and logged at debug level
//! - The flattener is the only writer of the five path-keyed fields

pub mod expander;
pub mod flattener;
pub mod merge;
pub mod projector;
pub mod remover;

pub use expander::{expand_instances, referenced_instances};
pub use flattener::{flatten, flatten_into};
pub use merge::add_objects;
pub use projector::{project, validate_key_names};
pub use remover::{remove_object, RemovalSummary};
