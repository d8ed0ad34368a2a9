//! Catalog trait and error types.

use std::cmp::Ordering;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::ObjectTemplate;
use crate::path;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by a template fetch.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid catalog data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog url: {0}")]
    Url(#[from] url::ParseError),
}

/// Result ordering requested from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Id,
    Name,
}

impl SortBy {
    /// Query parameter value understood by the catalog service.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortBy::Id => "id",
            SortBy::Name => "name",
        }
    }

    pub fn compare(&self, a: &ObjectTemplate, b: &ObjectTemplate) -> Ordering {
        match self {
            SortBy::Id => a.id.cmp(&b.id).then_with(|| path::compare(&a.key_id, &b.key_id)),
            SortBy::Name => path::compare(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)),
        }
    }
}

/// Source of object templates.
#[async_trait]
pub trait ObjectCatalog: Send + Sync {
    /// Templates whose `keyId` is in `ids`, ordered by `sort_by`.
    ///
    /// Ids with no matching template are absent from the result.
    async fn fetch_object_templates(
        &self,
        ids: &[String],
        sort_by: SortBy,
    ) -> CatalogResult<Vec<ObjectTemplate>>;
}
