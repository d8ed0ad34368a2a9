//! The canonical configuration document.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::AttributeMap;
use crate::path::ResourcePath;
use crate::profile::settings::{BootstrapSettings, ClientSettings, SettingsBlock};

/// Device-profile transport configuration for LWM2M devices.
///
/// Only `observeAttr` is owned by the tree core. The settings blocks and any
/// other top-level field are carried as raw JSON and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// Client behaviour and OTA update settings.
    #[serde(rename = "clientLwM2mSettings", default, skip_serializing_if = "Option::is_none")]
    pub client_settings: Option<Value>,

    /// Observe / attribute / telemetry selection and per-path overrides.
    #[serde(default)]
    pub observe_attr: ObserveAttr,

    /// Bootstrap and LWM2M server settings.
    #[serde(rename = "bootstrap", default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_settings: Option<Value>,

    /// Top-level fields owned by other editors (e.g. `type`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Default document with server settings pointing at `hostname`.
    pub fn with_host(hostname: &str) -> Self {
        Self {
            client_settings: Some(Value::Object(ClientSettings::default().to_block())),
            observe_attr: ObserveAttr::default(),
            bootstrap_settings: Some(Value::Object(BootstrapSettings::with_host(hostname).to_block())),
            extra: Map::new(),
        }
    }

    pub fn client_block(&self) -> Option<&SettingsBlock> {
        self.client_settings.as_ref().and_then(Value::as_object)
    }

    pub fn bootstrap_block(&self) -> Option<&SettingsBlock> {
        self.bootstrap_settings.as_ref().and_then(Value::as_object)
    }

    /// Client block for in-place patching. A missing or non-object block
    /// is replaced by an empty object first.
    pub fn client_block_mut(&mut self) -> Option<&mut SettingsBlock> {
        let block = self
            .client_settings
            .get_or_insert_with(|| Value::Object(Map::new()));
        if !block.is_object() {
            tracing::warn!("clientLwM2mSettings is not an object; replacing it");
            *block = Value::Object(Map::new());
        }
        block.as_object_mut()
    }
}

/// The five path-keyed fields. Only the flattener rebuilds these.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserveAttr {
    #[serde(default)]
    pub observe: Vec<ResourcePath>,

    #[serde(default)]
    pub attribute: Vec<ResourcePath>,

    #[serde(default)]
    pub telemetry: Vec<ResourcePath>,

    /// Display names, ordered by natural path order.
    #[serde(default)]
    pub key_name: BTreeMap<ResourcePath, String>,

    /// Attribute overrides at object, instance or resource granularity.
    #[serde(rename = "attributeLwm2m", default)]
    pub attribute_override: BTreeMap<ResourcePath, AttributeMap>,

    /// Fields of this block the tree core does not manage.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObserveAttr {
    /// Paths that are attributed or telemetered.
    pub fn reported_paths(&self) -> BTreeSet<&ResourcePath> {
        self.attribute.iter().chain(self.telemetry.iter()).collect()
    }

    /// Distinct object keys referenced by any of the five fields, in natural order.
    pub fn referenced_object_keys(&self) -> Vec<String> {
        let keys: BTreeSet<ResourcePath> = self
            .all_paths()
            .filter(|path| !path.object_key().is_empty())
            .map(|path| ResourcePath::object(path.object_key()))
            .collect();
        keys.into_iter()
            .map(|path| path.object_key().to_string())
            .collect()
    }

    /// Sort the three flag arrays and drop duplicates.
    pub fn canonicalize(&mut self) {
        for paths in [&mut self.observe, &mut self.attribute, &mut self.telemetry] {
            paths.sort();
            paths.dedup();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observe.is_empty()
            && self.attribute.is_empty()
            && self.telemetry.is_empty()
            && self.key_name.is_empty()
            && self.attribute_override.is_empty()
    }

    fn all_paths(&self) -> impl Iterator<Item = &ResourcePath> {
        self.observe
            .iter()
            .chain(self.attribute.iter())
            .chain(self.telemetry.iter())
            .chain(self.key_name.keys())
            .chain(self.attribute_override.keys())
    }
}
