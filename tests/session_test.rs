//! Session behaviour across the async catalog boundary.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use lwm2m_profile::catalog::CatalogError;
use lwm2m_profile::ota::{OtaDefaults, UpdateChannel, UpdateStrategy};
use lwm2m_profile::profile::DocumentIssue;
use lwm2m_profile::session::{ProfileSession, SessionError};

mod common;

use common::{DelayedCatalog, FailingCatalog};

#[tokio::test]
async fn test_stale_fetch_is_discarded() {
    let catalog = Arc::new(DelayedCatalog::new([
        Duration::from_millis(300),
        Duration::from_millis(10),
    ]));
    let session = ProfileSession::new(catalog, Duration::from_secs(5), OtaDefaults::default());

    let first = common::document(json!({"observeAttr": {"attribute": ["/3/0/1"]}}));
    let second = common::document(json!({"observeAttr": {"telemetry": ["/5/0/3"]}}));

    let (old, new) = tokio::join!(session.load(first), session.load(second));

    assert!(old.unwrap().is_none());
    let tree = new.unwrap().unwrap();
    assert!(tree.contains("5"));
    assert!(!tree.contains("3"));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.version, 2);
    assert_eq!(snapshot.document.observe_attr.telemetry, common::paths(&["/5/0/3"]));
    assert!(snapshot.document.observe_attr.attribute.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_leaves_document_unprojected() {
    let session = ProfileSession::new(Arc::new(FailingCatalog), Duration::from_secs(1), OtaDefaults::default());
    let doc = common::document(json!({
        "observeAttr": {"attribute": ["/3/0/1"], "keyName": {"/3/0/9": "stale"}}
    }));

    let err = session.load(doc.clone()).await.unwrap_err();
    assert!(matches!(err, SessionError::Catalog(CatalogError::Status { status: 503, .. })));
    assert_eq!(session.document(), doc);
}

#[tokio::test]
async fn test_fetch_timeout() {
    let catalog = Arc::new(DelayedCatalog::new([Duration::from_millis(500)]));
    let session = ProfileSession::new(catalog, Duration::from_millis(20), OtaDefaults::default());

    let doc = common::document(json!({"observeAttr": {"attribute": ["/3/0/1"]}}));
    let err = session.load(doc).await.unwrap_err();
    assert!(matches!(err, SessionError::Catalog(CatalogError::Timeout(_))));
}

#[tokio::test]
async fn test_override_only_object_is_fetched() {
    let session = ProfileSession::new(common::memory_catalog(), Duration::from_secs(1), OtaDefaults::default());
    let doc = common::document(json!({
        "observeAttr": {"attributeLwm2m": {"/19/0": {"pmin": 5}}}
    }));

    let tree = session.load(doc).await.unwrap().unwrap();
    assert!(tree.contains("19"));
    let edited = session.apply_edit(&tree);
    assert!(edited
        .observe_attr
        .attribute_override
        .contains_key(&lwm2m_profile::ResourcePath::instance("19", 0)));
}

#[tokio::test]
async fn test_publishable_document_tracks_ota_state() {
    let session = ProfileSession::new(common::memory_catalog(), Duration::from_secs(1), OtaDefaults::default());
    let mut doc = common::document(json!({
        "clientLwM2mSettings": {"fwUpdateStrategy": 2, "fwUpdateRecourse": ""}
    }));
    doc.bootstrap_settings = lwm2m_profile::profile::ConfigDocument::with_host("localhost").bootstrap_settings;
    session.submit(doc);

    let issues = session.publishable_document().unwrap_err();
    assert!(issues.contains(&DocumentIssue::MissingOtaResource(UpdateChannel::Firmware)));

    session.set_ota_strategy(UpdateChannel::Firmware, UpdateStrategy::None);
    let published = session.publishable_document().unwrap();
    let client = published.client_block().unwrap();
    assert_eq!(client["fwUpdateStrategy"], 0);
    assert_eq!(client["fwUpdateRecourse"], "");
}
