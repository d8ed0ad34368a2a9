//! Client and bootstrap settings carried alongside the observe selection.
//!
//! The document keeps both blocks exactly as persisted ([`SettingsBlock`]).
//! The typed structs below build default blocks for new profiles; the
//! readers pull individual values out of a raw block without reshaping it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ota::UpdateStrategy;

/// A settings block as persisted, keys in their stored order.
pub type SettingsBlock = Map<String, Value>;

pub const CLIENT_STRATEGY: &str = "clientStrategy";
pub const FW_UPDATE_STRATEGY: &str = "fwUpdateStrategy";
pub const SW_UPDATE_STRATEGY: &str = "swUpdateStrategy";
/// Persisted spelling of the firmware package URL key.
pub const FW_UPDATE_RESOURCE: &str = "fwUpdateRecourse";
pub const FW_UPDATE_RESOURCE_ALIAS: &str = "fwUpdateResource";
pub const SW_UPDATE_RESOURCE: &str = "swUpdateRecourse";
pub const SW_UPDATE_RESOURCE_ALIAS: &str = "swUpdateResource";

pub const SERVERS: &str = "servers";
pub const BOOTSTRAP_SERVER: &str = "bootstrapServer";
pub const LWM2M_SERVER: &str = "lwm2mServer";

pub const DEFAULT_ID_SERVER: u16 = 123;
pub const DEFAULT_ID_BOOTSTRAP: u16 = 111;
pub const DEFAULT_LOCAL_HOST_NAME: &str = "localhost";
pub const DEFAULT_PORT_SERVER_NO_SEC: u16 = 5685;
pub const DEFAULT_PORT_BOOTSTRAP_NO_SEC: u16 = 5687;
pub const DEFAULT_CLIENT_HOLD_OFF_TIME: u32 = 1;
pub const DEFAULT_LIFE_TIME: u32 = 300;
pub const DEFAULT_MIN_PERIOD: u32 = 1;
pub const DEFAULT_NOTIF_IF_DISABLED: bool = true;
pub const DEFAULT_BOOTSTRAP_SERVER_ACCOUNT_TIME_OUT: u32 = 0;
pub const DEFAULT_OTA_UPDATE_PROTOCOL: &str = "coap://";

/// Default OTA package location served by the platform's own CoAP endpoint.
pub fn default_update_resource() -> String {
    format!(
        "{}{}:{}",
        DEFAULT_OTA_UPDATE_PROTOCOL, DEFAULT_LOCAL_HOST_NAME, DEFAULT_PORT_SERVER_NO_SEC
    )
}

/// Client strategy and OTA update settings of a new profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    pub client_strategy: u8,
    pub fw_update_strategy: UpdateStrategy,
    pub sw_update_strategy: UpdateStrategy,

    #[serde(rename = "fwUpdateRecourse")]
    pub fw_update_resource: String,

    #[serde(rename = "swUpdateRecourse")]
    pub sw_update_resource: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            client_strategy: 1,
            fw_update_strategy: UpdateStrategy::default(),
            sw_update_strategy: UpdateStrategy::default(),
            fw_update_resource: default_update_resource(),
            sw_update_resource: default_update_resource(),
        }
    }
}

impl ClientSettings {
    pub fn to_block(&self) -> SettingsBlock {
        to_block(self)
    }
}

/// Client strategy of a raw block. Older profiles store it as a string.
pub fn client_strategy(block: &SettingsBlock) -> Option<u8> {
    match block.get(CLIENT_STRATEGY)? {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Nested object of a raw block, if present and an object.
pub fn section<'a>(block: &'a SettingsBlock, key: &str) -> Option<&'a SettingsBlock> {
    block.get(key).and_then(Value::as_object)
}

fn to_block<T: Serialize>(value: &T) -> SettingsBlock {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Transport binding modes a client may announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BindingMode {
    U,
    Uq,
    T,
    Tq,
    S,
    Sq,
    Us,
    Ts,
    Uqs,
    Tqs,
}

impl BindingMode {
    pub fn description(&self) -> &'static str {
        match self {
            BindingMode::U => "U: UDP connection in standard mode",
            BindingMode::Uq => "UQ: UDP connection in queue mode",
            BindingMode::Us => "US: both UDP and SMS connections active, both in standard mode",
            BindingMode::Uqs => {
                "UQS: both UDP and SMS connections active; UDP in queue mode, SMS in standard mode"
            }
            BindingMode::T => "T: TCP connection in standard mode",
            BindingMode::Tq => "TQ: TCP connection in queue mode",
            BindingMode::Ts => "TS: both TCP and SMS connections active, both in standard mode",
            BindingMode::Tqs => {
                "TQS: both TCP and SMS connections active; TCP in queue mode, SMS in standard mode"
            }
            BindingMode::S => "S: SMS connection in standard mode",
            BindingMode::Sq => "SQ: SMS connection in queue mode",
        }
    }
}

/// Security mode of a bootstrap or LWM2M server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityMode {
    Psk,
    Rpk,
    X509,
    #[default]
    NoSec,
}

impl SecurityMode {
    pub fn description(&self) -> &'static str {
        match self {
            SecurityMode::Psk => "Pre-Shared Key",
            SecurityMode::Rpk => "Raw Public Key",
            SecurityMode::X509 => "X.509 Certificate",
            SecurityMode::NoSec => "No Security",
        }
    }
}

/// Server-account defaults pushed to the client during bootstrap.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_min_period: Option<u32>,

    #[serde(default = "default_notif_if_disabled")]
    pub notif_if_disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<BindingMode>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_notif_if_disabled() -> bool {
    DEFAULT_NOTIF_IF_DISABLED
}

impl Default for ServersConfig {
    fn default() -> Self {
        Self {
            short_id: Some(DEFAULT_ID_SERVER),
            lifetime: Some(DEFAULT_LIFE_TIME),
            default_min_period: Some(DEFAULT_MIN_PERIOD),
            notif_if_disabled: DEFAULT_NOTIF_IF_DISABLED,
            binding: Some(BindingMode::Uq),
            extra: Map::new(),
        }
    }
}

/// Connection settings for one server (bootstrap or LWM2M).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSecurityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_port: Option<u16>,

    #[serde(default)]
    pub security_mode: SecurityMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_public_key_or_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_hold_off_time: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<u16>,

    #[serde(default)]
    pub bootstrap_server_account_timeout: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerSecurityConfig {
    /// Unsecured bootstrap server on `hostname`.
    pub fn bootstrap_default(hostname: &str) -> Self {
        Self {
            host: Some(hostname.to_string()),
            security_host: None,
            port: Some(DEFAULT_PORT_BOOTSTRAP_NO_SEC),
            security_port: None,
            security_mode: SecurityMode::NoSec,
            client_public_key_or_id: None,
            client_secret_key: None,
            server_public_key: Some(String::new()),
            client_hold_off_time: Some(DEFAULT_CLIENT_HOLD_OFF_TIME),
            server_id: Some(DEFAULT_ID_BOOTSTRAP),
            bootstrap_server_account_timeout: DEFAULT_BOOTSTRAP_SERVER_ACCOUNT_TIME_OUT,
            extra: Map::new(),
        }
    }

    /// Unsecured LWM2M server on `hostname`.
    pub fn lwm2m_default(hostname: &str) -> Self {
        Self {
            port: Some(DEFAULT_PORT_SERVER_NO_SEC),
            server_id: Some(DEFAULT_ID_SERVER),
            ..Self::bootstrap_default(hostname)
        }
    }
}

/// Bootstrap block of the profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<ServersConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_server: Option<ServerSecurityConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lwm2m_server: Option<ServerSecurityConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BootstrapSettings {
    pub fn with_host(hostname: &str) -> Self {
        Self {
            servers: Some(ServersConfig::default()),
            bootstrap_server: Some(ServerSecurityConfig::bootstrap_default(hostname)),
            lwm2m_server: Some(ServerSecurityConfig::lwm2m_default(hostname)),
            extra: Map::new(),
        }
    }
}

impl BootstrapSettings {
    pub fn to_block(&self) -> SettingsBlock {
        to_block(self)
    }
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self::with_host(DEFAULT_LOCAL_HOST_NAME)
    }
}
