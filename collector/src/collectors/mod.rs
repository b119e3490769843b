//! # Collectors Module
//!
//! The collection cycle and the trait the scheduler drives it through.
//!
//! - **`Collector` trait**: one `collect()` call is one cycle
//! - **`Orchestrator`**: discovers active Spark applications, fetches every category per application, shapes the
//!   records and posts them in batches

pub mod collector;
pub mod orchestrator;

pub use collector::{
    Collector,
    CycleReport,
};
pub use orchestrator::Orchestrator;
