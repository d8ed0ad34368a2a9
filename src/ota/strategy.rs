//! Update strategy and channel enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::profile::settings::{
    FW_UPDATE_RESOURCE, FW_UPDATE_RESOURCE_ALIAS, FW_UPDATE_STRATEGY, SW_UPDATE_RESOURCE,
    SW_UPDATE_RESOURCE_ALIAS, SW_UPDATE_STRATEGY,
};

/// How an update package reaches the device.
///
/// Persisted as a number: 0 = none, 1 = push, 2 = pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UpdateStrategy {
    /// Updates are not delivered over this channel.
    None,
    /// The package is written to the device as a binary resource.
    #[default]
    Push,
    /// The device downloads the package from a resource URL.
    Pull,
}

impl UpdateStrategy {
    pub fn requires_resource_url(&self) -> bool {
        matches!(self, UpdateStrategy::Pull)
    }

    /// Read a stored strategy: a wire number, a numeric string or a name.
    pub fn from_value(value: &Value) -> Result<Self, StrategyError> {
        match value {
            Value::Number(n) => match n.as_u64().map(u8::try_from) {
                Some(Ok(n)) => UpdateStrategy::try_from(n),
                _ => Err(StrategyError::UnknownName(n.to_string())),
            },
            Value::String(s) => s.parse(),
            other => Err(StrategyError::UnknownName(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("unknown update strategy value {0}")]
    UnknownValue(u8),

    #[error("unknown update strategy '{0}' (expected none, push or pull)")]
    UnknownName(String),
}

impl TryFrom<u8> for UpdateStrategy {
    type Error = StrategyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UpdateStrategy::None),
            1 => Ok(UpdateStrategy::Push),
            2 => Ok(UpdateStrategy::Pull),
            other => Err(StrategyError::UnknownValue(other)),
        }
    }
}

impl From<UpdateStrategy> for u8 {
    fn from(strategy: UpdateStrategy) -> Self {
        match strategy {
            UpdateStrategy::None => 0,
            UpdateStrategy::Push => 1,
            UpdateStrategy::Pull => 2,
        }
    }
}

impl FromStr for UpdateStrategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(UpdateStrategy::None),
            "push" | "1" => Ok(UpdateStrategy::Push),
            "pull" | "2" => Ok(UpdateStrategy::Pull),
            _ => Err(StrategyError::UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateStrategy::None => "none",
            UpdateStrategy::Push => "push",
            UpdateStrategy::Pull => "pull",
        };
        f.write_str(name)
    }
}

/// Update class carried by the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateChannel {
    Firmware,
    Software,
}

impl UpdateChannel {
    /// Key of the strategy in `clientLwM2mSettings`.
    pub fn strategy_key(&self) -> &'static str {
        match self {
            UpdateChannel::Firmware => FW_UPDATE_STRATEGY,
            UpdateChannel::Software => SW_UPDATE_STRATEGY,
        }
    }

    /// Persisted key of the resource URL, then its accepted alias.
    pub fn resource_keys(&self) -> [&'static str; 2] {
        match self {
            UpdateChannel::Firmware => [FW_UPDATE_RESOURCE, FW_UPDATE_RESOURCE_ALIAS],
            UpdateChannel::Software => [SW_UPDATE_RESOURCE, SW_UPDATE_RESOURCE_ALIAS],
        }
    }
}

impl fmt::Display for UpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateChannel::Firmware => f.write_str("firmware"),
            UpdateChannel::Software => f.write_str("software"),
        }
    }
}
