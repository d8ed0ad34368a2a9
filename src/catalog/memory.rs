//! In-memory catalog, optionally loaded from a JSON file.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::catalog::types::{CatalogResult, ObjectCatalog, SortBy};
use crate::model::ObjectTemplate;

/// Templates keyed by `keyId`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    templates: Arc<DashMap<String, ObjectTemplate>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: impl IntoIterator<Item = ObjectTemplate>) -> Self {
        let catalog = Self::new();
        for template in templates {
            catalog.insert(template);
        }
        catalog
    }

    /// Read a JSON array of templates.
    pub fn load_from_file(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let templates: Vec<ObjectTemplate> = serde_json::from_str(&content)?;
        Ok(Self::from_templates(templates))
    }

    /// Insert or replace a template.
    pub fn insert(&self, template: ObjectTemplate) {
        self.templates.insert(template.key_id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl ObjectCatalog for MemoryCatalog {
    async fn fetch_object_templates(
        &self,
        ids: &[String],
        sort_by: SortBy,
    ) -> CatalogResult<Vec<ObjectTemplate>> {
        let mut found: Vec<ObjectTemplate> = Vec::with_capacity(ids.len());
        for id in ids {
            if found.iter().any(|t| &t.key_id == id) {
                continue;
            }
            match self.templates.get(id) {
                Some(entry) => found.push(entry.value().clone()),
                None => tracing::debug!(object = %id, "Object not in catalog"),
            }
        }
        found.sort_by(|a, b| sort_by.compare(a, b));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn template(id: u16, key: &str) -> ObjectTemplate {
        serde_json::from_value(json!({
            "id": id,
            "keyId": key,
            "name": format!("Object {}", id),
            "instances": [{"id": 0, "resources": [{"id": 1, "name": "Value"}]}]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_only_requested_sorted() {
        let catalog = MemoryCatalog::from_templates([template(19, "19"), template(3, "3"), template(5, "5")]);
        let ids = vec!["19".to_string(), "3".to_string(), "404".to_string(), "3".to_string()];

        let found = catalog.fetch_object_templates(&ids, SortBy::Id).await.unwrap();
        let keys: Vec<_> = found.iter().map(|t| t.key_id.as_str()).collect();
        assert_eq!(keys, ["3", "19"]);
    }

    #[tokio::test]
    async fn test_returned_templates_are_copies() {
        let catalog = MemoryCatalog::from_templates([template(3, "3")]);
        let mut found = catalog
            .fetch_object_templates(&["3".to_string()], SortBy::Id)
            .await
            .unwrap();
        found[0].instances[0].resources[0].observe = true;

        let again = catalog
            .fetch_object_templates(&["3".to_string()], SortBy::Id)
            .await
            .unwrap();
        assert!(!again[0].instances[0].resources[0].observe);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = serde_json::to_string(&vec![template(3, "3"), template(5, "5")]).unwrap();
        write!(file, "{}", body).unwrap();

        let catalog = MemoryCatalog::load_from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_from_file_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(MemoryCatalog::load_from_file(file.path()).is_err());
    }
}
