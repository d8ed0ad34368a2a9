//! LWM2M device-profile engine.
//!
//! Converts between the flat, path-keyed profile document and the
//! object → instance → resource tree used for editing.

// Addressing and data model
pub mod model;
pub mod path;
pub mod profile;

// Document ⇄ tree engine
pub mod ota;
pub mod transform;

// Template sources and the live session
pub mod catalog;
pub mod session;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use catalog::{MemoryCatalog, ObjectCatalog};
pub use config::AppConfig;
pub use model::{ObjectTemplate, ProfileTree};
pub use path::ResourcePath;
pub use profile::ConfigDocument;
pub use session::ProfileSession;
