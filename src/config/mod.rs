//! Tool configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → catalog construction, OTA defaults, logging level
//!
//! Profile document on disk:
//!     watcher.rs detects change
//!     → profile::load_document parses it
//!     → new ConfigDocument sent over mpsc
//!     → session re-projects it
//! ```
//!
//! # Design Decisions
//! - Every field has a default so an absent config file is a valid config
//! - Validation collects all errors instead of stopping at the first
//! - The watcher keeps the current document when a reload fails to parse

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_or_default, ConfigError};
pub use schema::{AppConfig, CatalogConfig, CatalogSource, ObservabilityConfig, OtaConfig, WatchConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::DocumentWatcher;
