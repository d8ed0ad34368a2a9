//! Canonical path parsing and formatting.
//!
//! Paths come in three granularities: `/{objectKey}`,
//! `/{objectKey}/{instanceId}` and `/{objectKey}/{instanceId}/{resourceId}`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::path::sorter;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Addressing level of a [`ResourcePath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Object,
    Instance,
    Resource,
}

/// A parsed object, instance or resource address.
///
/// A resource id is only ever present together with an instance id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    object_key: String,
    instance_id: Option<u16>,
    resource_id: Option<u16>,
}

impl ResourcePath {
    /// Path addressing a whole object.
    pub fn object(object_key: impl Into<String>) -> Self {
        Self {
            object_key: object_key.into(),
            instance_id: None,
            resource_id: None,
        }
    }

    /// Path addressing one instance of an object.
    pub fn instance(object_key: impl Into<String>, instance_id: u16) -> Self {
        Self {
            object_key: object_key.into(),
            instance_id: Some(instance_id),
            resource_id: None,
        }
    }

    /// Path addressing a single resource.
    pub fn resource(object_key: impl Into<String>, instance_id: u16, resource_id: u16) -> Self {
        Self {
            object_key: object_key.into(),
            instance_id: Some(instance_id),
            resource_id: Some(resource_id),
        }
    }

    /// Parse a path string.
    ///
    /// Lenient: the leading separator is optional, and parsing stops at the
    /// first segment that is not a valid 16-bit id. `"/3/x/1"` yields `/3`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.strip_prefix(PATH_SEPARATOR).unwrap_or(raw);
        let mut segments = trimmed.split(PATH_SEPARATOR);
        let mut path = Self::object(segments.next().unwrap_or_default());

        if let Some(instance_id) = segments.next().and_then(|s| s.parse::<u16>().ok()) {
            path.instance_id = Some(instance_id);
            if let Some(resource_id) = segments.next().and_then(|s| s.parse::<u16>().ok()) {
                path.resource_id = Some(resource_id);
            }
        }
        path
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    pub fn instance_id(&self) -> Option<u16> {
        self.instance_id
    }

    pub fn resource_id(&self) -> Option<u16> {
        self.resource_id
    }

    /// Addressing level implied by the present segments.
    pub fn granularity(&self) -> Granularity {
        match (self.instance_id, self.resource_id) {
            (Some(_), Some(_)) => Granularity::Resource,
            (Some(_), None) => Granularity::Instance,
            _ => Granularity::Object,
        }
    }

    pub fn is_resource(&self) -> bool {
        self.granularity() == Granularity::Resource
    }

    /// True when the path lives under the given object key.
    pub fn belongs_to(&self, object_key: &str) -> bool {
        self.object_key == object_key
    }

    /// The enclosing instance path, if the path has an instance segment.
    pub fn instance_path(&self) -> Option<ResourcePath> {
        self.instance_id
            .map(|id| ResourcePath::instance(self.object_key.clone(), id))
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PATH_SEPARATOR, self.object_key)?;
        if let Some(instance_id) = self.instance_id {
            write!(f, "{}{}", PATH_SEPARATOR, instance_id)?;
            if let Some(resource_id) = self.resource_id {
                write!(f, "{}{}", PATH_SEPARATOR, resource_id)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for ResourcePath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        sorter::compare(&self.to_string(), &other.to_string())
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourcePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
