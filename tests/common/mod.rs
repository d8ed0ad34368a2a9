//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use lwm2m_profile::catalog::{CatalogError, CatalogResult, MemoryCatalog, ObjectCatalog, SortBy};
use lwm2m_profile::model::ObjectTemplate;
use lwm2m_profile::path::ResourcePath;
use lwm2m_profile::profile::ConfigDocument;

/// Device (3), Firmware Update (5) and BinaryAppDataContainer (19).
pub fn templates() -> Vec<ObjectTemplate> {
    serde_json::from_value(json!([
        {
            "id": 3, "keyId": "3", "name": "Device", "multiple": false, "mandatory": true,
            "instances": [{"id": 0, "resources": [
                {"id": 0, "name": "Manufacturer", "keyName": "manufacturer"},
                {"id": 1, "name": "Model Number", "keyName": "modelNumber"},
                {"id": 2, "name": "Serial Number", "keyName": "serialNumber"},
                {"id": 9, "name": "Battery Level", "keyName": "batteryLevel"}
            ]}]
        },
        {
            "id": 5, "keyId": "5", "name": "Firmware Update", "multiple": false, "mandatory": false,
            "instances": [{"id": 0, "resources": [
                {"id": 1, "name": "Package URI", "keyName": "packageUri"},
                {"id": 3, "name": "State", "keyName": "state"},
                {"id": 5, "name": "Update Result", "keyName": "updateResult"}
            ]}]
        },
        {
            "id": 19, "keyId": "19", "name": "BinaryAppDataContainer", "multiple": true, "mandatory": false,
            "instances": [{"id": 0, "resources": [
                {"id": 0, "name": "Data", "keyName": "data"},
                {"id": 1, "name": "Data Priority", "keyName": "dataPriority"}
            ]}]
        }
    ]))
    .unwrap()
}

pub fn memory_catalog() -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog::from_templates(templates()))
}

pub fn paths(raw: &[&str]) -> Vec<ResourcePath> {
    raw.iter().map(|p| ResourcePath::parse(p)).collect()
}

pub fn document(value: serde_json::Value) -> ConfigDocument {
    serde_json::from_value(value).unwrap()
}

/// Catalog whose calls each wait for the next queued delay.
pub struct DelayedCatalog {
    inner: MemoryCatalog,
    delays: Mutex<VecDeque<Duration>>,
}

impl DelayedCatalog {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            inner: MemoryCatalog::from_templates(templates()),
            delays: Mutex::new(delays.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ObjectCatalog for DelayedCatalog {
    async fn fetch_object_templates(
        &self,
        ids: &[String],
        sort_by: SortBy,
    ) -> CatalogResult<Vec<ObjectTemplate>> {
        let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.inner.fetch_object_templates(ids, sort_by).await
    }
}

/// Catalog that always answers with a server error.
pub struct FailingCatalog;

#[async_trait]
impl ObjectCatalog for FailingCatalog {
    async fn fetch_object_templates(
        &self,
        _ids: &[String],
        _sort_by: SortBy,
    ) -> CatalogResult<Vec<ObjectTemplate>> {
        Err(CatalogError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }
}

/// Start a mock catalog service returning a fixed status and body.
///
/// Returns its address and the request lines it received.
pub async fn start_catalog_service(status: u16, body: String) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();
    let body = Arc::new(body);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    let body = body.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        seen.lock().unwrap().push(head);

                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, requests)
}
