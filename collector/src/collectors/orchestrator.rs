use crate::{
    collectors::{
        Collector,
        CycleReport,
    },
    error::Result,
    events::{
        shape,
        EventKind,
        MetricRecord,
    },
    ingest::NewRelicClient,
    labels::LabelSet,
    spark::{
        RuntimeFiles,
        SparkClient,
        SparkEndpoints,
    },
};
use nri_spark_config::Config;
use std::{
    future::Future,
    pin::Pin,
};
use strum::IntoEnumIterator;
use tokio::sync::RwLock;
use url::Url;

/// Runs collection cycles: discovery, per-category fetch, shaping and delivery.
///
/// Endpoint placeholders are resolved on the first cycle that can read the runtime files and are kept for all
/// later cycles. Cycles may overlap, the resolution is idempotent.
pub struct Orchestrator {
    spark: SparkClient,
    newrelic: NewRelicClient,
    labels: LabelSet,
    endpoints: RwLock<SparkEndpoints>,
    runtime_files: RuntimeFiles,
}

impl Orchestrator {
    /// Creates an orchestrator whose labels include `NEWRELIC_TAGS` from the environment.
    pub fn new(config: &Config) -> Result<Self> {
        let labels = LabelSet::from_env(&config.labels, &config.spark.cluster_name);
        Self::with_labels(config, labels)
    }

    pub fn with_labels(config: &Config, labels: LabelSet) -> Result<Self> {
        Ok(Self {
            spark: SparkClient::new()?,
            newrelic: NewRelicClient::new(&config.newrelic)?,
            labels,
            endpoints: RwLock::new(SparkEndpoints::from(&config.spark)),
            runtime_files: RuntimeFiles::from(&config.spark),
        })
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub async fn endpoints(&self) -> SparkEndpoints {
        self.endpoints.read().await.clone()
    }

    async fn resolved_endpoints(&self) -> Result<SparkEndpoints> {
        {
            let endpoints = self.endpoints.read().await;
            if endpoints.is_resolved() {
                return Ok(endpoints.clone());
            }
        }

        let mut endpoints = self.endpoints.write().await;
        endpoints.resolve(&self.runtime_files).await?;
        Ok(endpoints.clone())
    }

    /// One collection cycle.
    pub async fn run(&self) -> Result<CycleReport> {
        debug!("Executing collection cycle");
        let mut report = CycleReport::default();

        let endpoints = self.resolved_endpoints().await?;
        let Some(master_url) = endpoints.master_url()? else {
            warn!("spark master_ui_port is unresolved, skipping this cycle");
            return Ok(report);
        };

        let app_ids = self.spark.active_applications(&master_url).await;
        if app_ids.is_empty() {
            debug!(url = %master_url, "No active spark applications");
            return Ok(report);
        }

        let ui_url = endpoints.ui_url()?;
        let labels = self.labels.with_driver_host(endpoints.driver_host()?);

        for app_id in &app_ids {
            info!(%app_id, "Collecting spark application");
            report.applications += 1;

            for kind in EventKind::iter() {
                let events = self.collect_category(&ui_url, app_id, kind, &labels).await;
                if events.is_empty() {
                    continue;
                }
                report.events_shaped += events.len();
                report.delivery += self.newrelic.post_batches(&events).await;
            }
        }

        info!(
            applications = report.applications,
            events = report.events_shaped,
            batches_sent = report.delivery.sent,
            batches_failed = report.delivery.failed,
            "Collection cycle finished"
        );
        Ok(report)
    }

    async fn collect_category(&self, ui_url: &Url, app_id: &str, kind: EventKind, labels: &LabelSet) -> Vec<MetricRecord> {
        let Some(records) = self.spark.fetch_records(ui_url, app_id, kind).await else {
            return Vec::new();
        };
        debug!(%app_id, event_type = %kind, count = records.len(), "Processing spark records");

        records
            .into_iter()
            .filter_map(|raw| {
                let record = shape(kind, raw, labels);
                if record.is_none() {
                    warn!(%app_id, event_type = %kind, "Skipping spark record that is not a JSON object");
                }
                record
            })
            .collect()
    }
}

impl Collector for Orchestrator {
    fn collect(&self) -> Pin<Box<dyn Future<Output = Result<CycleReport>> + Send + '_>> {
        Box::pin(self.run())
    }

    fn name(&self) -> &'static str {
        "Orchestrator"
    }
}
