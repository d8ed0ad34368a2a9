//! Catalog backed by the platform's LWM2M object service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;

use crate::catalog::types::{CatalogError, CatalogResult, ObjectCatalog, SortBy};
use crate::model::ObjectTemplate;

const OBJECTS_ENDPOINT: &str = "api/resource/lwm2m";
const AUTH_HEADER: &str = "x-authorization";

/// HTTP client for `GET {base}/api/resource/lwm2m`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpCatalog {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> CatalogResult<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(OBJECTS_ENDPOINT)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTH_HEADER, value);
            } else {
                tracing::warn!("Catalog token is not a valid header value; sending requests without it");
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Full request URL for a fetch.
    pub fn request_url(&self, ids: &[String], sort_by: SortBy) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("sortProperty", sort_by.as_param())
            .append_pair("sortOrder", "ASC")
            .append_pair("objectIds", &ids.join(","));
        url
    }
}

#[async_trait]
impl ObjectCatalog for HttpCatalog {
    async fn fetch_object_templates(
        &self,
        ids: &[String],
        sort_by: SortBy,
    ) -> CatalogResult<Vec<ObjectTemplate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.request_url(ids, sort_by);
        tracing::debug!(url = %url, "Fetching object templates");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout(self.timeout)
            } else {
                CatalogError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let mut templates: Vec<ObjectTemplate> = serde_json::from_slice(&bytes)?;
        templates.retain(|t| ids.contains(&t.key_id));
        templates.sort_by(|a, b| sort_by.compare(a, b));
        Ok(templates)
    }
}
