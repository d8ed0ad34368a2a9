//! OTA update strategy handling.
//!
//! # State Transitions
//! ```text
//! strategy → pull      : resource URL required + enabled, seeded if empty
//! strategy → none|push : requirement cleared, field disabled, value retained
//! ```
//!
//! Firmware and software channels are evaluated independently.

pub mod strategy;
pub mod validator;

pub use strategy::{UpdateChannel, UpdateStrategy};
pub use validator::{OtaChannelState, OtaDefaults, OtaSettings};
