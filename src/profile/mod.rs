//! Persisted LWM2M device-profile configuration.
//!
//! # Data Flow
//! ```text
//! profile JSON (device profile transport configuration)
//!     → store.rs (read & deserialize, lenient paths)
//!     → document.rs (ConfigDocument: settings + five path-keyed fields)
//!     → transform/* (projection, flattening, removal)
//!     → validation.rs (user-correctable issues, never fatal)
//!     → store.rs (canonical JSON out)
//! ```
//!
//! # Design Decisions
//! - Client and bootstrap settings are kept as raw JSON blocks and read on
//!   demand, so they pass through the core byte for byte
//! - Only `set_ota_strategy` writes into a block, and only the keys it owns
//! - An invalid document is a state, reported as a list of issues

pub mod document;
pub mod settings;
pub mod store;
pub mod validation;

pub use document::{ConfigDocument, ObserveAttr};
pub use settings::{
    BindingMode, BootstrapSettings, ClientSettings, SecurityMode, ServerSecurityConfig,
    ServersConfig, SettingsBlock,
};
pub use store::{load_document, save_document, DocumentError};
pub use validation::{validate_document, DocumentIssue};
