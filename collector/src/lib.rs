//! # Spark Event Collector
//!
//! Polls a Spark cluster's REST endpoints and forwards job, stage, executor and streaming statistics as events to
//! the New Relic events API.
//!
//! ## Architecture
//!
//! - **`spark`**: HTTP access to the master and application UIs, placeholder resolution from runtime files
//! - **`events`**: Typed allow-lists per event kind and the shaping of raw records into flat events
//! - **`labels`**: Cluster labels stamped on every event
//! - **`ingest`**: Batching, compression and delivery to the events API
//! - **`collectors`**: The `Collector` trait and the `Orchestrator` running one collection cycle
//! - **`scheduler`**: One-shot or periodic execution with bounded overlap
//!
//! ## Data flow
//!
//! ```text
//! scheduler -> Orchestrator::run -> SparkClient (discovery, per category) -> shape -> NewRelicClient (per batch)
//! ```

#[macro_use]
extern crate tracing;

pub mod collectors;
pub mod error;
pub mod events;
pub mod ingest;
pub mod labels;
pub mod scheduler;
pub mod spark;

pub use collectors::*;
pub use error::{
    Error,
    IngestError,
    Result,
};
pub use events::{
    EventKind,
    MetricRecord,
};
pub use ingest::NewRelicClient;
pub use labels::LabelSet;
pub use scheduler::{
    Mode,
    PeriodicTask,
};
pub use spark::SparkClient;
