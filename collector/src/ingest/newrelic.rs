use crate::{
    error::{
        Error,
        IngestError,
        Result,
    },
    events::MetricRecord,
    ingest::{
        batches,
        BatchReport,
    },
};
use flate2::{
    write::GzEncoder,
    Compression,
};
use nri_spark_config::{
    ApiKey,
    NewRelicConfig,
};
use reqwest::{
    header::{
        CONTENT_ENCODING,
        CONTENT_TYPE,
    },
    Client as HttpClient,
    StatusCode,
};
use std::{
    io::Write as _,
    time::Duration,
};

pub const API_KEY_HEADER: &str = "Api-Key";
pub const CONTENT_ENCODING_GZIP: &str = "gzip";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the New Relic events API. Endpoint and key are fixed at construction.
#[derive(Debug, Clone)]
pub struct NewRelicClient {
    http_client: HttpClient,
    url: String,
    api_key: ApiKey,
}

impl NewRelicClient {
    pub fn new(config: &NewRelicConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self::with_client(http_client, config.events_url(), config.api_key.clone()))
    }

    pub fn with_client(http_client: HttpClient, url: String, api_key: ApiKey) -> Self {
        info!(%url, "Setting New Relic API endpoint");
        Self {
            http_client,
            url,
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts one gzip-compressed JSON array of events.
    ///
    /// Any HTTP response is returned as its status code; only a failure to complete the request is an error.
    pub async fn post_events(&self, events: &[MetricRecord]) -> Result<StatusCode, IngestError> {
        let payload = gzip(&serde_json::to_vec(events)?)?;

        let response = self
            .http_client
            .post(&self.url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(CONTENT_ENCODING, CONTENT_ENCODING_GZIP)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| IngestError::Transport {
                url: self.url.clone(),
                source,
            })?;

        Ok(response.status())
    }

    /// Posts `events` in request-sized batches, in order. Each batch succeeds or fails on its own.
    pub async fn post_batches(&self, events: &[MetricRecord]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, batch) in batches(events).enumerate() {
            match self.post_events(batch).await {
                Ok(status) if status == StatusCode::OK => {
                    info!(batch = index, "{} events posted to New Relic event collector", batch.len());
                    report.sent += 1;
                    report.events_sent += batch.len();
                }
                Ok(status) => {
                    error!(
                        batch = index,
                        status = status.as_u16(),
                        "New Relic events collector responded with status code {status}"
                    );
                    report.failed += 1;
                }
                Err(err) => {
                    error!(batch = index, "{err}");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}
