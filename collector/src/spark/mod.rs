//! # Spark Module
//!
//! HTTP access to the Spark master and application UIs.
//!
//! A failed request never aborts a collection cycle: non-200 responses, transport errors and undecodable bodies are
//! logged and reported as "no data", and the caller skips that category for the cycle.

mod endpoints;

pub use endpoints::{
    application_url,
    DriverEnv,
    RuntimeFiles,
    SparkEndpoints,
};

use crate::{
    error::{
        Error,
        Result,
    },
    events::EventKind,
};
use reqwest::{
    Client as HttpClient,
    StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Listing served by the master at `/json/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasterStatus {
    #[serde(default)]
    pub activeapps: Vec<ActiveApplication>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveApplication {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct SparkClient {
    http_client: HttpClient,
}

impl SparkClient {
    pub fn new() -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self::with_client(http_client))
    }

    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// GETs `url` and decodes the body. `None` means there is no data for this cycle.
    pub async fn fetch_json(&self, url: &Url) -> Option<Value> {
        let response = match self.http_client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                error!(%url, "Error executing spark request: {err}");
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(
                %url,
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or_default(),
                %body,
                "Spark UI request failed"
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(err) => {
                error!(%url, "Spark UI returned an undecodable body: {err}");
                None
            }
        }
    }

    /// Ids of the applications the master currently reports as active, in listing order.
    pub async fn active_applications(&self, master_url: &Url) -> Vec<String> {
        let Some(listing) = self.fetch_json(master_url).await else {
            return Vec::new();
        };

        match serde_json::from_value::<MasterStatus>(listing) {
            Ok(status) => status.activeapps.into_iter().map(|app| app.id).collect(),
            Err(err) => {
                error!(url = %master_url, "Unexpected spark master listing: {err}");
                Vec::new()
            }
        }
    }

    /// Raw records of one category for one application.
    pub async fn fetch_records(&self, ui_url: &Url, app_id: &str, kind: EventKind) -> Option<Vec<Value>> {
        let url = match application_url(ui_url, app_id, kind) {
            Ok(url) => url,
            Err(err) => {
                error!(%app_id, event_type = %kind, "{err}");
                return None;
            }
        };
        let value = self.fetch_json(&url).await?;
        records_from_value(value).or_else(|| {
            warn!(%url, event_type = %kind, "Ignoring spark response that is neither an array nor an object");
            None
        })
    }
}

/// Category endpoints return arrays, except `streaming/statistics` which answers with a single object.
pub fn records_from_value(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(records) => Some(records),
        record @ Value::Object(_) => Some(vec![record]),
        _ => None,
    }
}
