//! Document validation.
//!
//! # Responsibilities
//! - Required bootstrap fields are present
//! - OTA resource URL present and well-formed when a channel pulls
//! - Attribute overrides only use known attribute names
//!
//! # Design Decisions
//! - Returns all issues, not just the first
//! - Issues are user-correctable: the document is held back, never rejected
//!   with a panic or a hard error

use serde_json::Value;
use thiserror::Error;

use crate::model::attributes::unknown_attributes;
use crate::ota::{OtaSettings, UpdateChannel};
use crate::profile::document::ConfigDocument;
use crate::profile::settings::{section, SettingsBlock, BOOTSTRAP_SERVER, LWM2M_SERVER, SERVERS};

/// A reason the document cannot be propagated downstream yet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentIssue {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has invalid value {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("{channel} update strategy {value} is not one of 0, 1, 2")]
    InvalidOtaStrategy { channel: UpdateChannel, value: String },

    #[error("{0} update strategy pulls from a resource URL but none is set")]
    MissingOtaResource(UpdateChannel),

    #[error("{channel} resource URL '{url}' is invalid: {reason}")]
    InvalidOtaResource {
        channel: UpdateChannel,
        url: String,
        reason: String,
    },

    #[error("unknown attribute '{name}' on {path}")]
    UnknownAttribute { path: String, name: String },
}

/// Validate a document, collecting every issue.
pub fn validate_document(document: &ConfigDocument) -> Result<(), Vec<DocumentIssue>> {
    let mut issues = Vec::new();

    check_bootstrap(document.bootstrap_block(), &mut issues);
    issues.extend(OtaSettings::from_client(document.client_block()).issues());

    for (path, overrides) in &document.observe_attr.attribute_override {
        for name in unknown_attributes(overrides) {
            issues.push(DocumentIssue::UnknownAttribute {
                path: path.to_string(),
                name: name.to_string(),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

const SERVER_FIELDS: [(&str, &str, u64); 3] = [
    ("shortId", "bootstrap.servers.shortId", u16::MAX as u64),
    ("lifetime", "bootstrap.servers.lifetime", u32::MAX as u64),
    ("defaultMinPeriod", "bootstrap.servers.defaultMinPeriod", u32::MAX as u64),
];

fn check_bootstrap(bootstrap: Option<&SettingsBlock>, issues: &mut Vec<DocumentIssue>) {
    let empty = SettingsBlock::new();
    let bootstrap = bootstrap.unwrap_or(&empty);

    match section(bootstrap, SERVERS) {
        Some(servers) => {
            for (key, field, max) in SERVER_FIELDS {
                match servers.get(key) {
                    None | Some(Value::Null) => issues.push(DocumentIssue::MissingField(field)),
                    Some(value) if value.as_u64().map_or(true, |n| n > max) => {
                        issues.push(DocumentIssue::InvalidField {
                            field,
                            value: value.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        None => issues.push(DocumentIssue::MissingField("bootstrap.servers")),
    }
    if section(bootstrap, BOOTSTRAP_SERVER).is_none() {
        issues.push(DocumentIssue::MissingField("bootstrap.bootstrapServer"));
    }
    if section(bootstrap, LWM2M_SERVER).is_none() {
        issues.push(DocumentIssue::MissingField("bootstrap.lwm2mServer"));
    }
}
