//! Document holder with stale-fetch discard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::catalog::{CatalogError, ObjectCatalog, SortBy};
use crate::model::{ObjectTemplate, ProfileTree};
use crate::observability::metrics;
use crate::ota::{OtaDefaults, OtaSettings, UpdateChannel, UpdateStrategy};
use crate::profile::{validate_document, ConfigDocument, DocumentIssue};
use crate::transform::{self, RemovalSummary};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("catalog fetch failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// A published document and the version it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub version: u64,
    pub document: ConfigDocument,
}

pub struct ProfileSession<C: ObjectCatalog + ?Sized = dyn ObjectCatalog> {
    catalog: Arc<C>,
    fetch_timeout: Duration,
    ota_defaults: OtaDefaults,
    version: AtomicU64,
    current: ArcSwap<DocumentSnapshot>,
}

impl<C: ObjectCatalog + ?Sized> ProfileSession<C> {
    pub fn new(catalog: Arc<C>, fetch_timeout: Duration, ota_defaults: OtaDefaults) -> Self {
        Self {
            catalog,
            fetch_timeout,
            ota_defaults,
            version: AtomicU64::new(0),
            current: ArcSwap::from_pointee(DocumentSnapshot {
                version: 0,
                document: ConfigDocument::default(),
            }),
        }
    }

    /// Latest submitted version.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Arc<DocumentSnapshot> {
        self.current.load_full()
    }

    pub fn document(&self) -> ConfigDocument {
        self.current.load().document.clone()
    }

    /// Publish `document` as a new version, superseding any in-flight load.
    pub fn submit(&self, document: ConfigDocument) -> u64 {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let next = Arc::new(DocumentSnapshot { version, document });
        self.current.rcu(|current| {
            if current.version < version {
                Arc::clone(&next)
            } else {
                Arc::clone(current)
            }
        });
        tracing::debug!(version, "Document submitted");
        version
    }

    /// Submit `document`, fetch its templates and project the tree.
    ///
    /// Returns `Ok(None)` when another document was submitted while the
    /// fetch was in flight.
    pub async fn load(&self, document: ConfigDocument) -> Result<Option<ProfileTree>, SessionError> {
        let version = self.submit(document.clone());
        let ids = document.observe_attr.referenced_object_keys();
        let templates = self.fetch(&ids).await?;

        if !self.is_current(version) {
            discard(version, self.version());
            return Ok(None);
        }

        let mut document = document;
        let tree = transform::project(&templates, &mut document.observe_attr);
        if !self.publish_if_current(version, document) {
            discard(version, self.version());
            return Ok(None);
        }

        tracing::info!(version, objects = tree.objects.len(), "Profile tree loaded");
        Ok(Some(tree))
    }

    /// Flatten an edited tree into the current document.
    pub fn apply_edit(&self, tree: &ProfileTree) -> ConfigDocument {
        self.update(|document| transform::flatten_into(tree, document))
    }

    /// Remove an object from the tree and every reference to it from the document.
    pub fn remove_object(&self, tree: &mut ProfileTree, object_key: &str) -> (RemovalSummary, ConfigDocument) {
        let mut observe_attr = self.current.load().document.observe_attr.clone();
        let summary = transform::remove_object(tree, &mut observe_attr, object_key);
        let document = self.update(|document| document.observe_attr = observe_attr.clone());
        (summary, document)
    }

    /// Fetch templates for `ids` not yet in the tree and merge them in.
    pub async fn add_objects_by_id(&self, tree: &mut ProfileTree, ids: &[String]) -> Result<usize, SessionError> {
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !tree.contains(id))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }
        let templates = self.fetch(&missing).await?;
        Ok(transform::add_objects(tree, &templates))
    }

    /// Change an OTA channel's strategy on the current document. Only the
    /// channel's strategy and resource keys are written.
    pub fn set_ota_strategy(&self, channel: UpdateChannel, strategy: UpdateStrategy) -> ConfigDocument {
        self.update(|document| {
            let mut ota = OtaSettings::from_client(document.client_block());
            ota.set_strategy(channel, strategy, &self.ota_defaults);
            if let Some(block) = document.client_block_mut() {
                ota.channel(channel).write_to(channel, block);
            }
        })
    }

    /// The current document, if it may be propagated downstream.
    pub fn publishable_document(&self) -> Result<ConfigDocument, Vec<DocumentIssue>> {
        let document = self.document();
        validate_document(&document)?;
        Ok(document)
    }

    fn is_current(&self, version: u64) -> bool {
        self.version() == version
    }

    async fn fetch(&self, ids: &[String]) -> Result<Vec<ObjectTemplate>, CatalogError> {
        let result = tokio::time::timeout(
            self.fetch_timeout,
            self.catalog.fetch_object_templates(ids, SortBy::Id),
        )
        .await;

        match result {
            Ok(Ok(templates)) => {
                metrics::record_catalog_fetch("ok");
                tracing::debug!(requested = ids.len(), found = templates.len(), "Catalog fetch complete");
                Ok(templates)
            }
            Ok(Err(e)) => {
                metrics::record_catalog_fetch("error");
                tracing::warn!(error = %e, "Catalog fetch failed");
                Err(e)
            }
            Err(_) => {
                metrics::record_catalog_fetch("timeout");
                tracing::warn!(timeout = ?self.fetch_timeout, "Catalog fetch timed out");
                Err(CatalogError::Timeout(self.fetch_timeout))
            }
        }
    }

    fn publish_if_current(&self, version: u64, document: ConfigDocument) -> bool {
        let next = Arc::new(DocumentSnapshot { version, document });
        let previous = self.current.rcu(|current| {
            if current.version == version {
                Arc::clone(&next)
            } else {
                Arc::clone(current)
            }
        });
        previous.version == version
    }

    fn update<F>(&self, mut edit: F) -> ConfigDocument
    where
        F: FnMut(&mut ConfigDocument),
    {
        let previous = self.current.rcu(|current| {
            let mut document = current.document.clone();
            edit(&mut document);
            Arc::new(DocumentSnapshot {
                version: current.version,
                document,
            })
        });
        tracing::debug!(version = previous.version, "Document edited");
        self.document()
    }
}

fn discard(version: u64, current: u64) {
    metrics::record_stale_fetch();
    tracing::info!(version, current, "Discarding catalog result for superseded document");
}
