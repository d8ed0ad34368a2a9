//! Protocol-level attribute overrides (`pmin`, `pmax`, thresholds, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute overrides attached to an object, instance or resource.
///
/// Values are kept as raw JSON so that integer, float and string
/// representations survive a round trip untouched.
pub type AttributeMap = BTreeMap<String, serde_json::Value>;

/// Known LWM2M notification attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeName {
    Dim,
    Ver,
    Pmin,
    Pmax,
    Gt,
    Lt,
    St,
}

impl AttributeName {
    pub const ALL: [AttributeName; 7] = [
        AttributeName::Dim,
        AttributeName::Ver,
        AttributeName::Pmin,
        AttributeName::Pmax,
        AttributeName::Gt,
        AttributeName::Lt,
        AttributeName::St,
    ];

    /// Key used in the persisted override map.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeName::Dim => "dim",
            AttributeName::Ver => "ver",
            AttributeName::Pmin => "pmin",
            AttributeName::Pmax => "pmax",
            AttributeName::Gt => "gt",
            AttributeName::Lt => "lt",
            AttributeName::St => "st",
        }
    }

    /// Short label as written in an attribute query string.
    pub fn label(&self) -> &'static str {
        match self {
            AttributeName::Dim => "dim=",
            AttributeName::Ver => "ver=",
            AttributeName::Pmin => "pmin=",
            AttributeName::Pmax => "pmax=",
            AttributeName::Gt => ">",
            AttributeName::Lt => "<",
            AttributeName::St => "st=",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AttributeName::Dim => "Dimension",
            AttributeName::Ver => "Object version",
            AttributeName::Pmin => "Minimum period",
            AttributeName::Pmax => "Maximum period",
            AttributeName::Gt => "Greater than",
            AttributeName::Lt => "Lesser than",
            AttributeName::St => "Step",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys of `map` that are not known attribute names.
pub fn unknown_attributes(map: &AttributeMap) -> Vec<&str> {
    map.keys()
        .map(String::as_str)
        .filter(|key| AttributeName::parse(key).is_none())
        .collect()
}

/// The override map, if present and carrying at least one entry.
pub fn non_empty(map: &Option<AttributeMap>) -> Option<&AttributeMap> {
    map.as_ref().filter(|m| !m.is_empty())
}
