use crate::{
    error::Result,
    ingest::BatchReport,
};
use std::{
    future::Future,
    pin::Pin,
};

/// Something the scheduler can run once per tick.
pub trait Collector {
    /// Run one collection cycle
    fn collect(&self) -> Pin<Box<dyn Future<Output = Result<CycleReport>> + Send + '_>>;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}

/// What a single collection cycle did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub applications: usize,
    pub events_shaped: usize,
    pub delivery: BatchReport,
}
