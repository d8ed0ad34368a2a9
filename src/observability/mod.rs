//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or configured level)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (object keys, paths, versions) instead of formatted text
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
