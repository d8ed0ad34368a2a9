//! Editable object tree model.
//!
//! # Structure
//! ```text
//! ProfileTree
//!     → ObjectNode   (keyId, attribute overrides)
//!         → InstanceNode  (id, attribute overrides)
//!             → ResourceNode  (observe / attribute / telemetry, keyName, overrides)
//! ```
//!
//! # Design Decisions
//! - The tree owns deep copies of catalog templates; templates are never mutated
//! - Nodes are addressed through typed resolvers instead of string properties
//! - Unresolved lookups return `None`; callers decide whether to skip

pub mod attributes;
pub mod naming;
pub mod tree;

pub use attributes::{AttributeMap, AttributeName};
pub use tree::{
    InstanceNode, NodeMut, ObjectNode, ObjectTemplate, Multiplicity, ProfileTree, ResourceFlag,
    ResourceNode,
};
