//! Resource-URL requirement rule for OTA channels.

use serde_json::Value;

use crate::ota::strategy::{UpdateChannel, UpdateStrategy};
use crate::profile::settings::{default_update_resource, SettingsBlock};
use crate::profile::validation::DocumentIssue;

/// Default package URLs seeded when a channel switches to pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaDefaults {
    pub firmware_resource_url: String,
    pub software_resource_url: String,
}

impl Default for OtaDefaults {
    fn default() -> Self {
        Self {
            firmware_resource_url: default_update_resource(),
            software_resource_url: default_update_resource(),
        }
    }
}

impl OtaDefaults {
    pub fn resource_url(&self, channel: UpdateChannel) -> &str {
        match channel {
            UpdateChannel::Firmware => &self.firmware_resource_url,
            UpdateChannel::Software => &self.software_resource_url,
        }
    }
}

/// Editing state of one update channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaChannelState {
    pub strategy: UpdateStrategy,
    pub resource_url: String,
    /// The resource URL must be non-empty.
    pub required: bool,
    /// The resource URL is editable.
    pub enabled: bool,
    /// Stored strategy value that could not be read.
    pub unrecognized: Option<String>,
}

impl OtaChannelState {
    pub fn new(strategy: UpdateStrategy, resource_url: impl Into<String>) -> Self {
        let pull = strategy.requires_resource_url();
        Self {
            strategy,
            resource_url: resource_url.into(),
            required: pull,
            enabled: pull,
            unrecognized: None,
        }
    }

    /// Read one channel out of a raw client block.
    ///
    /// A missing strategy reads as the default; an unreadable one also does,
    /// and is remembered so validation can report it.
    pub fn read(block: Option<&SettingsBlock>, channel: UpdateChannel) -> Self {
        let stored = block.and_then(|b| b.get(channel.strategy_key()));
        let (strategy, unrecognized) = match stored.map(UpdateStrategy::from_value) {
            None => (UpdateStrategy::default(), None),
            Some(Ok(strategy)) => (strategy, None),
            Some(Err(e)) => {
                tracing::debug!(channel = %channel, error = %e, "Unreadable update strategy");
                (UpdateStrategy::default(), stored.map(ToString::to_string))
            }
        };
        let resource_url = block
            .and_then(|b| {
                channel
                    .resource_keys()
                    .into_iter()
                    .find_map(|key| b.get(key).and_then(Value::as_str))
            })
            .unwrap_or_default();

        Self {
            unrecognized,
            ..Self::new(strategy, resource_url)
        }
    }

    /// Patch this channel's keys in a raw client block, leaving every other key alone.
    ///
    /// The URL is written under whichever spelling the block already uses, and
    /// is not added when empty and absent.
    pub fn write_to(&self, channel: UpdateChannel, block: &mut SettingsBlock) {
        block.insert(
            channel.strategy_key().to_string(),
            Value::from(u8::from(self.strategy)),
        );

        let [key, alias] = channel.resource_keys();
        let target = if block.contains_key(key) {
            key
        } else if block.contains_key(alias) {
            alias
        } else if self.resource_url.is_empty() {
            return;
        } else {
            key
        };
        block.insert(target.to_string(), Value::String(self.resource_url.clone()));
    }

    /// Apply a strategy change. The stored URL is never erased.
    pub fn set_strategy(&mut self, strategy: UpdateStrategy, default_url: &str) {
        self.strategy = strategy;
        self.unrecognized = None;
        if strategy.requires_resource_url() {
            self.required = true;
            self.enabled = true;
            if self.resource_url.trim().is_empty() {
                self.resource_url = default_url.to_string();
            }
        } else {
            self.required = false;
            self.enabled = false;
        }
    }

    pub fn issue(&self, channel: UpdateChannel) -> Option<DocumentIssue> {
        if let Some(value) = &self.unrecognized {
            return Some(DocumentIssue::InvalidOtaStrategy {
                channel,
                value: value.clone(),
            });
        }
        if !self.required {
            return None;
        }
        let url = self.resource_url.trim();
        if url.is_empty() {
            return Some(DocumentIssue::MissingOtaResource(channel));
        }
        match url::Url::parse(url) {
            Ok(_) => None,
            Err(e) => Some(DocumentIssue::InvalidOtaResource {
                channel,
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Firmware and software channel state of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtaSettings {
    pub firmware: OtaChannelState,
    pub software: OtaChannelState,
}

impl OtaSettings {
    pub fn from_client(block: Option<&SettingsBlock>) -> Self {
        Self {
            firmware: OtaChannelState::read(block, UpdateChannel::Firmware),
            software: OtaChannelState::read(block, UpdateChannel::Software),
        }
    }

    pub fn channel(&self, channel: UpdateChannel) -> &OtaChannelState {
        match channel {
            UpdateChannel::Firmware => &self.firmware,
            UpdateChannel::Software => &self.software,
        }
    }

    pub fn set_strategy(
        &mut self,
        channel: UpdateChannel,
        strategy: UpdateStrategy,
        defaults: &OtaDefaults,
    ) {
        let state = match channel {
            UpdateChannel::Firmware => &mut self.firmware,
            UpdateChannel::Software => &mut self.software,
        };
        state.set_strategy(strategy, defaults.resource_url(channel));
        tracing::debug!(
            channel = %channel,
            strategy = %strategy,
            required = state.required,
            "OTA strategy changed"
        );
    }

    /// Write both channels back into a raw client block.
    pub fn apply_to(&self, block: &mut SettingsBlock) {
        self.firmware.write_to(UpdateChannel::Firmware, block);
        self.software.write_to(UpdateChannel::Software, block);
    }

    pub fn issues(&self) -> Vec<DocumentIssue> {
        [UpdateChannel::Firmware, UpdateChannel::Software]
            .into_iter()
            .filter_map(|channel| self.channel(channel).issue(channel))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_requires_and_seeds_url() {
        let mut state = OtaChannelState::new(UpdateStrategy::Push, "");
        assert!(!state.required);
        assert!(!state.enabled);

        state.set_strategy(UpdateStrategy::Pull, "coap://localhost:5685");
        assert!(state.required);
        assert!(state.enabled);
        assert_eq!(state.resource_url, "coap://localhost:5685");
        assert!(state.issue(UpdateChannel::Firmware).is_none());
    }

    #[test]
    fn test_pull_keeps_existing_url() {
        let mut state = OtaChannelState::new(UpdateStrategy::None, "coap://ota.example:5685");
        state.set_strategy(UpdateStrategy::Pull, "coap://localhost:5685");
        assert_eq!(state.resource_url, "coap://ota.example:5685");
    }

    #[test]
    fn test_leaving_pull_retains_value() {
        let mut state = OtaChannelState::new(UpdateStrategy::Pull, "coap://ota.example:5685");
        state.set_strategy(UpdateStrategy::None, "coap://localhost:5685");
        assert!(!state.required);
        assert!(!state.enabled);
        assert_eq!(state.resource_url, "coap://ota.example:5685");
    }

    #[test]
    fn test_missing_url_is_an_issue() {
        let mut state = OtaChannelState::new(UpdateStrategy::Pull, "coap://x:1");
        state.resource_url.clear();
        assert_eq!(
            state.issue(UpdateChannel::Software),
            Some(DocumentIssue::MissingOtaResource(UpdateChannel::Software))
        );

        state.resource_url = "not a url".into();
        assert!(matches!(
            state.issue(UpdateChannel::Software),
            Some(DocumentIssue::InvalidOtaResource { .. })
        ));
    }

    fn block(value: Value) -> SettingsBlock {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_channels_are_independent() {
        let mut client = block(json!({"clientStrategy": "1", "fwUpdateStrategy": 1, "swUpdateStrategy": 1}));
        let mut ota = OtaSettings::from_client(Some(&client));
        ota.set_strategy(UpdateChannel::Firmware, UpdateStrategy::Pull, &OtaDefaults::default());

        assert!(ota.firmware.required);
        assert!(!ota.software.required);
        assert!(ota.software.resource_url.is_empty());
        assert!(ota.issues().is_empty());

        ota.firmware.write_to(UpdateChannel::Firmware, &mut client);
        assert_eq!(
            serde_json::to_string(&client).unwrap(),
            r#"{"clientStrategy":"1","fwUpdateStrategy":2,"swUpdateStrategy":1,"fwUpdateRecourse":"coap://localhost:5685"}"#
        );
    }

    #[test]
    fn test_write_keeps_alias_spelling() {
        let mut client = block(json!({"swUpdateStrategy": 2, "swUpdateResource": "coap://sw.example:5685"}));
        let mut ota = OtaSettings::from_client(Some(&client));
        assert_eq!(ota.software.resource_url, "coap://sw.example:5685");

        ota.set_strategy(UpdateChannel::Software, UpdateStrategy::None, &OtaDefaults::default());
        ota.apply_to(&mut client);

        assert_eq!(client["swUpdateStrategy"], 0);
        assert_eq!(client["swUpdateResource"], "coap://sw.example:5685");
        assert!(!client.contains_key("swUpdateRecourse"));
        assert!(!client.contains_key("fwUpdateRecourse"));
    }

    #[test]
    fn test_unreadable_strategy_is_an_issue() {
        let client = block(json!({"fwUpdateStrategy": 3}));
        let mut ota = OtaSettings::from_client(Some(&client));
        assert_eq!(ota.firmware.strategy, UpdateStrategy::Push);
        assert_eq!(
            ota.issues(),
            vec![DocumentIssue::InvalidOtaStrategy {
                channel: UpdateChannel::Firmware,
                value: "3".into()
            }]
        );

        ota.set_strategy(UpdateChannel::Firmware, UpdateStrategy::Push, &OtaDefaults::default());
        assert!(ota.issues().is_empty());
    }

    #[test]
    fn test_missing_block_reads_defaults() {
        let ota = OtaSettings::from_client(None);
        assert_eq!(ota.firmware.strategy, UpdateStrategy::Push);
        assert!(ota.issues().is_empty());
    }
}
