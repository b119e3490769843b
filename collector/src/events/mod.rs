//! # Events Module
//!
//! Shapes raw Spark REST records into flat New Relic events.
//!
//! Every event kind has a static allow-list of attribute names. Shaping keeps the raw keys that appear in the
//! allow-list with their values untouched, stamps the cluster labels and sets `eventType`.

mod fields;

pub use fields::{
    EXECUTOR_FIELDS,
    JOB_FIELDS,
    STAGE_FIELDS,
    STREAMING_STATISTICS_FIELDS,
};

use crate::labels::LabelSet;
use serde::Serialize;
use serde_json::{
    Map,
    Value,
};
use strum::{
    Display,
    EnumIter,
    IntoStaticStr,
};

pub const EVENT_TYPE_KEY: &str = "eventType";

/// Nested executor object whose entries are lifted to the top level of the event.
pub const MEMORY_METRICS_KEY: &str = "memoryMetrics";

/// The four metric categories, in the order they are collected for every application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum EventKind {
    #[strum(to_string = "SparkJob")]
    Job,
    #[strum(to_string = "SparkStage")]
    Stage,
    #[strum(to_string = "SparkExecutor")]
    Executor,
    #[strum(to_string = "SparkStreamingStatistics")]
    StreamingStatistics,
}

impl EventKind {
    /// Value of the `eventType` attribute.
    pub fn event_type(&self) -> &'static str {
        self.into()
    }

    /// Path below `/api/v1/applications/{app_id}/`.
    pub fn api_path(&self) -> &'static str {
        match self {
            EventKind::Job => "jobs",
            EventKind::Stage => "stages",
            EventKind::Executor => "executors",
            EventKind::StreamingStatistics => "streaming/statistics",
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EventKind::Job => &JOB_FIELDS,
            EventKind::Stage => &STAGE_FIELDS,
            EventKind::Executor => &EXECUTOR_FIELDS,
            EventKind::StreamingStatistics => &STREAMING_STATISTICS_FIELDS,
        }
    }
}

/// Shapes one raw record of the given kind, or `None` when the record is not a JSON object.
///
/// Merge order: allow-listed fields, executor `memoryMetrics` entries, labels, `eventType`. Later writes win, so
/// labels override source fields and `eventType` always names the kind. Values are copied as they are, `null`
/// included.
pub fn shape(kind: EventKind, raw: Value, labels: &LabelSet) -> Option<MetricRecord> {
    let Value::Object(mut raw) = raw else {
        return None;
    };

    let mut record: Map<String, Value> = kind
        .fields()
        .iter()
        .filter_map(|field| raw.remove_entry(*field))
        .collect();

    if kind == EventKind::Executor {
        if let Some(Value::Object(memory_metrics)) = raw.remove(MEMORY_METRICS_KEY) {
            record.extend(memory_metrics);
        }
    }
    for (key, value) in labels.iter() {
        record.insert(key.clone(), Value::String(value.clone()));
    }
    record.insert(EVENT_TYPE_KEY.to_string(), Value::String(kind.event_type().to_string()));

    Some(MetricRecord(record))
}

/// A flat event as posted to the events API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricRecord(Map<String, Value>);

impl MetricRecord {
    pub fn event_type(&self) -> Option<&str> {
        self.0.get(EVENT_TYPE_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
