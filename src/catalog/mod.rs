//! Object template catalogs.
//!
//! # Data Flow
//! ```text
//! ConfigDocument
//!     → referenced_object_keys()
//!     → ObjectCatalog::fetch_object_templates(ids, SortBy::Id)
//!         ├─ MemoryCatalog (templates loaded from a JSON file)
//!         └─ HttpCatalog (catalog service over HTTP)
//!     → Vec<ObjectTemplate> (only requested ids, unknown ids absent)
//!     → transform::project
//! ```
//!
//! # Design Decisions
//! - One async trait so the session does not care where templates come from
//! - Unknown ids are not an error; the projector skips what it cannot resolve
//! - Templates are always returned as owned copies

pub mod http;
pub mod memory;
pub mod types;

use std::sync::Arc;

pub use http::HttpCatalog;
pub use memory::MemoryCatalog;
pub use types::{CatalogError, CatalogResult, ObjectCatalog, SortBy};

use crate::config::{CatalogConfig, CatalogSource};

/// Build the catalog selected by configuration.
pub fn build_catalog(config: &CatalogConfig) -> CatalogResult<Arc<dyn ObjectCatalog>> {
    match config.source {
        CatalogSource::File => {
            let catalog = MemoryCatalog::load_from_file(config.path.as_ref())?;
            tracing::info!(path = %config.path, objects = catalog.len(), "Loaded file catalog");
            Ok(Arc::new(catalog))
        }
        CatalogSource::Http => {
            let catalog = HttpCatalog::new(&config.base_url, config.token(), config.timeout())?;
            tracing::info!(base_url = %config.base_url, "Using HTTP catalog");
            Ok(Arc::new(catalog))
        }
    }
}
