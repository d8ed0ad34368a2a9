//! Object, instance and resource nodes plus typed path resolution.

use serde::{Deserialize, Serialize};

use crate::model::attributes::AttributeMap;
use crate::path::{Granularity, ResourcePath};

/// Whether an object may have more than one instance on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    Multiple,
}

/// Catalog definition of an LWM2M object, as delivered by the registry.
///
/// Always carries a single default instance with id 0.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTemplate {
    /// Numeric object id from the registry (e.g. 3 for Device).
    pub id: u16,

    /// Stable alias used in paths (e.g. "3" or "3_1.1").
    pub key_id: String,

    pub name: String,

    #[serde(default)]
    pub multiple: bool,

    #[serde(default)]
    pub mandatory: bool,

    #[serde(default)]
    pub instances: Vec<InstanceNode>,
}

impl ObjectTemplate {
    pub fn multiplicity(&self) -> Multiplicity {
        if self.multiple {
            Multiplicity::Multiple
        } else {
            Multiplicity::Single
        }
    }
}

/// Root node of one object in the editable tree.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    pub id: u16,
    pub key_id: String,
    pub name: String,

    #[serde(default)]
    pub multiple: bool,

    #[serde(default)]
    pub mandatory: bool,

    #[serde(rename = "attributeLwm2m", default, skip_serializing_if = "Option::is_none")]
    pub attribute_override: Option<AttributeMap>,

    #[serde(default)]
    pub instances: Vec<InstanceNode>,
}

impl ObjectNode {
    /// Deep copy of a catalog template. The template itself is left untouched.
    pub fn from_template(template: &ObjectTemplate) -> Self {
        Self {
            id: template.id,
            key_id: template.key_id.clone(),
            name: template.name.clone(),
            multiple: template.multiple,
            mandatory: template.mandatory,
            attribute_override: None,
            instances: template
                .instances
                .iter()
                .map(|instance| instance.clone_with_id(instance.id))
                .collect(),
        }
    }

    pub fn instance(&self, id: u16) -> Option<&InstanceNode> {
        self.instances.iter().find(|instance| instance.id == id)
    }

    pub fn instance_mut(&mut self, id: u16) -> Option<&mut InstanceNode> {
        self.instances.iter_mut().find(|instance| instance.id == id)
    }

    pub fn path(&self) -> ResourcePath {
        ResourcePath::object(self.key_id.clone())
    }
}

/// A concrete occurrence of an object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceNode {
    pub id: u16,

    #[serde(rename = "attributeLwm2m", default, skip_serializing_if = "Option::is_none")]
    pub attribute_override: Option<AttributeMap>,

    #[serde(default)]
    pub resources: Vec<ResourceNode>,
}

impl InstanceNode {
    /// Structural copy of this instance under a new id.
    pub fn clone_with_id(&self, id: u16) -> Self {
        Self {
            id,
            attribute_override: self.attribute_override.clone(),
            resources: self
                .resources
                .iter()
                .map(|resource| ResourceNode {
                    id: resource.id,
                    name: resource.name.clone(),
                    observe: resource.observe,
                    attribute: resource.attribute,
                    telemetry: resource.telemetry,
                    key_name: resource.key_name.clone(),
                    attribute_override: resource.attribute_override.clone(),
                })
                .collect(),
        }
    }

    pub fn resource(&self, id: u16) -> Option<&ResourceNode> {
        self.resources.iter().find(|resource| resource.id == id)
    }

    pub fn resource_mut(&mut self, id: u16) -> Option<&mut ResourceNode> {
        self.resources.iter_mut().find(|resource| resource.id == id)
    }
}

/// The three independent reporting classifications of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFlag {
    Observe,
    Attribute,
    Telemetry,
}

/// An individual value within an instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    pub id: u16,
    pub name: String,

    #[serde(default)]
    pub observe: bool,

    #[serde(default)]
    pub attribute: bool,

    #[serde(default)]
    pub telemetry: bool,

    #[serde(default)]
    pub key_name: String,

    #[serde(rename = "attributeLwm2m", default, skip_serializing_if = "Option::is_none")]
    pub attribute_override: Option<AttributeMap>,
}

impl ResourceNode {
    pub fn set_flag(&mut self, flag: ResourceFlag, value: bool) {
        match flag {
            ResourceFlag::Observe => self.observe = value,
            ResourceFlag::Attribute => self.attribute = value,
            ResourceFlag::Telemetry => self.telemetry = value,
        }
    }

    /// Attributed or telemetered: the resource produces persisted paths.
    pub fn is_reported(&self) -> bool {
        self.attribute || self.telemetry
    }
}

/// Mutable reference to whichever node a path resolves to.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Object(&'a mut ObjectNode),
    Instance(&'a mut InstanceNode),
    Resource(&'a mut ResourceNode),
}

impl NodeMut<'_> {
    pub fn set_attribute_override(self, overrides: AttributeMap) {
        match self {
            NodeMut::Object(node) => node.attribute_override = Some(overrides),
            NodeMut::Instance(node) => node.attribute_override = Some(overrides),
            NodeMut::Resource(node) => node.attribute_override = Some(overrides),
        }
    }
}

/// The editable projection of a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProfileTree {
    #[serde(rename = "clientLwM2M", default)]
    pub objects: Vec<ObjectNode>,
}

impl ProfileTree {
    pub fn new(objects: Vec<ObjectNode>) -> Self {
        Self { objects }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, object_key: &str) -> bool {
        self.object(object_key).is_some()
    }

    pub fn object(&self, object_key: &str) -> Option<&ObjectNode> {
        self.objects.iter().find(|object| object.key_id == object_key)
    }

    pub fn object_mut(&mut self, object_key: &str) -> Option<&mut ObjectNode> {
        self.objects.iter_mut().find(|object| object.key_id == object_key)
    }

    /// Resolve a resource-granularity path.
    pub fn resource(&self, path: &ResourcePath) -> Option<&ResourceNode> {
        let object = self.object(path.object_key())?;
        let instance = object.instance(path.instance_id()?)?;
        instance.resource(path.resource_id()?)
    }

    /// Resolve a resource-granularity path for mutation.
    pub fn resource_mut(&mut self, path: &ResourcePath) -> Option<&mut ResourceNode> {
        let object = self.object_mut(path.object_key())?;
        let instance = object.instance_mut(path.instance_id()?)?;
        instance.resource_mut(path.resource_id()?)
    }

    /// Resolve a path of any granularity to its node.
    pub fn resolve_mut(&mut self, path: &ResourcePath) -> Option<NodeMut<'_>> {
        let object = self.object_mut(path.object_key())?;
        match (path.granularity(), path.instance_id(), path.resource_id()) {
            (Granularity::Object, _, _) => Some(NodeMut::Object(object)),
            (Granularity::Instance, Some(instance_id), _) => {
                object.instance_mut(instance_id).map(NodeMut::Instance)
            }
            (Granularity::Resource, Some(instance_id), Some(resource_id)) => object
                .instance_mut(instance_id)?
                .resource_mut(resource_id)
                .map(NodeMut::Resource),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_template() -> ObjectTemplate {
        serde_json::from_value(json!({
            "id": 3,
            "keyId": "3",
            "name": "Device",
            "multiple": false,
            "mandatory": true,
            "instances": [{
                "id": 0,
                "resources": [
                    {"id": 0, "name": "Manufacturer", "keyName": "manufacturer"},
                    {"id": 1, "name": "Model Number", "keyName": "modelNumber"}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_template_json_shape() {
        let template = device_template();
        assert_eq!(template.multiplicity(), Multiplicity::Single);
        assert_eq!(template.instances.len(), 1);
        assert!(!template.instances[0].resources[1].observe);
        assert_eq!(template.instances[0].resources[1].key_name, "modelNumber");
    }

    #[test]
    fn test_from_template_is_independent() {
        let template = device_template();
        let mut node = ObjectNode::from_template(&template);
        node.instances[0].resources[0].attribute = true;
        node.instances[0].resources[0].key_name = "vendor".into();

        assert!(!template.instances[0].resources[0].attribute);
        assert_eq!(template.instances[0].resources[0].key_name, "manufacturer");
    }

    #[test]
    fn test_resolvers() {
        let mut tree = ProfileTree::new(vec![ObjectNode::from_template(&device_template())]);

        let path = ResourcePath::resource("3", 0, 1);
        tree.resource_mut(&path).unwrap().set_flag(ResourceFlag::Telemetry, true);
        assert!(tree.resource(&path).unwrap().telemetry);

        assert!(tree.resource(&ResourcePath::resource("3", 1, 1)).is_none());
        assert!(tree.resource(&ResourcePath::resource("4", 0, 1)).is_none());
        assert!(tree.resource(&ResourcePath::instance("3", 0)).is_none());

        assert!(matches!(
            tree.resolve_mut(&ResourcePath::object("3")),
            Some(NodeMut::Object(_))
        ));
        assert!(matches!(
            tree.resolve_mut(&ResourcePath::instance("3", 0)),
            Some(NodeMut::Instance(_))
        ));
        assert!(tree.resolve_mut(&ResourcePath::instance("3", 7)).is_none());
    }

    #[test]
    fn test_tree_serializes_with_persisted_names() {
        let mut tree = ProfileTree::new(vec![ObjectNode::from_template(&device_template())]);
        let mut overrides = AttributeMap::new();
        overrides.insert("pmin".into(), json!(5));
        tree.resolve_mut(&ResourcePath::object("3"))
            .unwrap()
            .set_attribute_override(overrides);

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["clientLwM2M"][0]["keyId"], "3");
        assert_eq!(value["clientLwM2M"][0]["attributeLwm2m"]["pmin"], 5);
        assert!(value["clientLwM2M"][0]["instances"][0].get("attributeLwm2m").is_none());
    }
}
