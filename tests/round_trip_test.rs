//! Document ⇄ tree properties.

use std::collections::BTreeMap;

use serde_json::json;

use lwm2m_profile::path::{sort_paths, ResourcePath};
use lwm2m_profile::transform::{add_objects, flatten, flatten_into, project, remove_object};

mod common;

#[test]
fn test_round_trip_canonical_document() {
    let mut doc = common::document(json!({
        "observeAttr": {
            "observe": ["/5/0/3", "/3/0/9"],
            "attribute": ["/3/0/2", "/3/0/0"],
            "telemetry": ["/5/0/3", "/3/0/9"],
            "keyName": {
                "/3/0/0": "manufacturer",
                "/3/0/2": "serial",
                "/3/0/9": "battery",
                "/5/0/3": "fwState"
            },
            "attributeLwm2m": {
                "/3": {"pmin": 10},
                "/3/0/9": {"pmax": 60, "gt": 80}
            }
        }
    }));
    let original = doc.clone();

    let mut observe_attr = doc.observe_attr.clone();
    let tree = project(&common::templates(), &mut observe_attr);
    flatten_into(&tree, &mut doc);

    let mut expected = original.observe_attr.clone();
    expected.canonicalize();
    assert_eq!(doc.observe_attr, expected);
    assert_eq!(doc.observe_attr.attribute, common::paths(&["/3/0/0", "/3/0/2"]));
    assert_eq!(doc.client_settings, original.client_settings);
    assert_eq!(doc.bootstrap_settings, original.bootstrap_settings);
}

#[test]
fn test_sort_is_idempotent_and_natural() {
    let mut raw = vec!["/19/0/10", "/3/0/1", "/19/0/2", "/3_1.1/0/1", "/3/0/11"];
    sort_paths(&mut raw);
    let once = raw.clone();
    sort_paths(&mut raw);
    assert_eq!(raw, once);
    assert_eq!(raw, ["/3/0/1", "/3/0/11", "/3_1.1/0/1", "/19/0/2", "/19/0/10"]);
}

#[test]
fn test_instance_expansion_determinism() {
    let template = serde_json::from_value(json!({
        "id": 3, "keyId": "3", "name": "Device",
        "instances": [{"id": 0, "resources": [{"id": 1, "name": "x"}]}]
    }))
    .unwrap();
    let mut observe_attr = common::document(json!({
        "observeAttr": {"attribute": ["/3/2/1"]}
    }))
    .observe_attr;

    let tree = project(&[template], &mut observe_attr);
    let object = tree.object("3").unwrap();
    let ids: Vec<u16> = object.instances.iter().map(|i| i.id).collect();
    assert_eq!(ids, [0, 2]);

    let resource = tree.resource(&ResourcePath::resource("3", 2, 1)).unwrap();
    assert_eq!(resource.key_name, "x2");
    assert!(resource.attribute);
    assert!(!tree.resource(&ResourcePath::resource("3", 0, 1)).unwrap().attribute);
}

#[test]
fn test_removal_purges_all_references() {
    let mut observe_attr = common::document(json!({
        "observeAttr": {
            "attribute": ["/3/0/1"],
            "telemetry": ["/3/0/2"],
            "keyName": {"/3/0/1": "a", "/3/0/2": "b"}
        }
    }))
    .observe_attr;
    let mut tree = project(&common::templates(), &mut observe_attr);

    let summary = remove_object(&mut tree, &mut observe_attr, "3");

    assert!(summary.node_removed);
    assert!(observe_attr.attribute.is_empty());
    assert!(observe_attr.telemetry.is_empty());
    assert!(observe_attr.key_name.is_empty());
    assert!(!tree.contains("3"));
}

#[test]
fn test_lenient_resolution() {
    let mut observe_attr = common::document(json!({
        "observeAttr": {"attribute": ["/99/0/1", "not/a/path", "/3/0/1"]}
    }))
    .observe_attr;

    let tree = project(&common::templates(), &mut observe_attr);
    assert!(!tree.contains("99"));

    let flattened = flatten(&tree);
    assert_eq!(flattened.attribute, common::paths(&["/3/0/1"]));
}

#[test]
fn test_key_name_pruning() {
    let mut observe_attr = common::document(json!({
        "observeAttr": {"keyName": {"/3/0/1": "a"}}
    }))
    .observe_attr;

    let tree = project(&common::templates(), &mut observe_attr);
    assert!(observe_attr.key_name.is_empty());
    assert_eq!(flatten(&tree).key_name, BTreeMap::new());
}

#[test]
fn test_added_object_keeps_existing_flags() {
    let mut observe_attr = common::document(json!({
        "observeAttr": {"telemetry": ["/19/0/0"], "keyName": {"/19/0/0": "data"}}
    }))
    .observe_attr;
    let catalog = common::templates();
    let mut tree = project(&catalog[2..], &mut observe_attr);

    let added = add_objects(&mut tree, &catalog);
    assert_eq!(added, 2);

    let keys: Vec<&str> = tree.objects.iter().map(|o| o.key_id.as_str()).collect();
    assert_eq!(keys, ["3", "5", "19"]);

    let flattened = flatten(&tree);
    assert_eq!(flattened.telemetry, common::paths(&["/19/0/0"]));
    assert_eq!(flattened.key_name.len(), 1);
}

#[test]
fn test_settings_blocks_survive_edit_cycle_byte_for_byte() {
    let client = r#"{"swUpdateStrategy":1,"clientStrategy":"1","fwUpdateRecourse":"coap://ota:5685","fwUpdateStrategy":3,"vendorFlag":null}"#;
    let bootstrap = r#"{"servers":{"shortId":70000,"binding":"UQ","lifetime":300},"lwm2mServer":{"securityMode":"X509","host":"h"},"bootstrapServer":{"port":5687}}"#;
    let raw = format!(
        r#"{{"clientLwM2mSettings":{client},"observeAttr":{{"attribute":["/3/0/2","/3/0/0"],"observe":[],"telemetry":[],"keyName":{{}},"attributeLwm2m":{{}}}},"bootstrap":{bootstrap},"type":"LWM2M"}}"#
    );

    let mut doc: lwm2m_profile::profile::ConfigDocument = serde_json::from_str(&raw).unwrap();
    let mut observe_attr = doc.observe_attr.clone();
    let tree = project(&common::templates(), &mut observe_attr);
    flatten_into(&tree, &mut doc);
    let serialized = serde_json::to_string(&doc).unwrap();

    assert_eq!(serde_json::to_string(&doc.client_settings).unwrap(), client);
    assert_eq!(serde_json::to_string(&doc.bootstrap_settings).unwrap(), bootstrap);
    assert!(serialized.contains(&format!(r#""clientLwM2mSettings":{client}"#)));
    assert!(serialized.contains(&format!(r#""bootstrap":{bootstrap}"#)));
    assert!(serialized.ends_with(r#","type":"LWM2M"}"#));
}
