//! # Scheduler Module
//!
//! Runs a [`Collector`] once, or on a fixed interval with a bounded number of overlapping cycles.
//!
//! Every tick is scheduled on its own: a slow cycle may still be running when the next tick fires, in which case
//! the new cycle runs alongside it as long as fewer than `max_instances` cycles are in flight. Ticks that find the
//! limit reached are skipped, never queued or coalesced.

use crate::collectors::{
    Collector,
    CycleReport,
};
use nri_spark_config::Config;
use std::{
    future::Future,
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::Semaphore,
    time::{
        Instant,
        MissedTickBehavior,
    },
};

/// Overlapping cycles allowed by default.
pub const DEFAULT_MAX_INSTANCES: usize = 3;

/// How the process drives the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    OneShot,
    Service { period: Duration },
}

impl Mode {
    pub fn from_config(config: &Config) -> Self {
        if config.run_as_service {
            Mode::Service {
                period: config.poll_interval,
            }
        } else {
            Mode::OneShot
        }
    }
}

/// Runs a single cycle. A failed cycle is logged, never propagated.
pub async fn run_once<C: Collector + ?Sized>(collector: &C) -> Option<CycleReport> {
    match collector.collect().await {
        Ok(report) => Some(report),
        Err(err) => {
            error!(collector = collector.name(), "Collection cycle failed: {err}");
            None
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleStats {
    pub started: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct PeriodicTask {
    period: Duration,
    max_instances: usize,
}

impl PeriodicTask {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            max_instances: DEFAULT_MAX_INSTANCES,
        }
    }

    pub fn max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances.max(1);
        self
    }

    /// Ticks every period, starting one period from now, until `shutdown` completes. Cycles still running at
    /// shutdown are not waited for.
    pub async fn run<C>(&self, collector: Arc<C>, shutdown: impl Future<Output = ()>) -> ScheduleStats
    where
        C: Collector + Send + Sync + ?Sized + 'static,
    {
        let permits = Arc::new(Semaphore::new(self.max_instances));
        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut stats = ScheduleStats::default();
        tokio::pin!(shutdown);

        info!(
            collector = collector.name(),
            period_secs = self.period.as_secs_f64(),
            max_instances = self.max_instances,
            "Starting scheduler"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let Ok(permit) = Arc::clone(&permits).try_acquire_owned() else {
                        stats.skipped += 1;
                        warn!(
                            collector = collector.name(),
                            max_instances = self.max_instances,
                            "Skipping cycle, maximum number of running instances reached"
                        );
                        continue;
                    };

                    stats.started += 1;
                    let collector = Arc::clone(&collector);
                    tokio::spawn(async move {
                        let _permit = permit;
                        run_once(collector.as_ref()).await;
                    });
                }
            }
        }

        info!(started = stats.started, skipped = stats.skipped, "Scheduler stopped");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    const PERIOD: Duration = Duration::from_secs(1);

    #[derive(Default)]
    struct SlowCollector {
        work: Duration,
        fail: bool,
        runs: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl Collector for SlowCollector {
        fn collect(&self) -> std::pin::Pin<Box<dyn Future<Output = crate::Result<CycleReport>> + Send + '_>> {
            Box::pin(async move {
                self.runs.fetch_add(1, Ordering::SeqCst);
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(self.work).await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                if self.fail {
                    Err(Error::Unresolved("driver_host"))
                } else {
                    Ok(CycleReport::default())
                }
            })
        }

        fn name(&self) -> &'static str {
            "SlowCollector"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_one_period_out() {
        let collector = Arc::new(SlowCollector::default());
        let stats = PeriodicTask::new(PERIOD)
            .run(collector.clone(), tokio::time::sleep(PERIOD / 2))
            .await;
        assert_eq!(stats, ScheduleStats::default());
        assert_eq!(collector.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn overlap_is_capped() {
        let collector = Arc::new(SlowCollector {
            work: PERIOD * 10,
            ..Default::default()
        });
        let stats = PeriodicTask::new(PERIOD)
            .max_instances(3)
            .run(collector.clone(), tokio::time::sleep(PERIOD * 30 + PERIOD / 2))
            .await;

        assert_eq!(stats.started + stats.skipped, 30);
        assert!(stats.started >= 3, "{stats:?}");
        assert!(stats.skipped >= 7, "{stats:?}");
        assert_eq!(collector.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycles_keep_the_schedule() {
        let collector = Arc::new(SlowCollector {
            fail: true,
            ..Default::default()
        });
        let stats = PeriodicTask::new(PERIOD)
            .run(collector.clone(), tokio::time::sleep(PERIOD * 5 + PERIOD / 2))
            .await;
        tokio::task::yield_now().await;

        assert_eq!(stats, ScheduleStats { started: 5, skipped: 0 });
        assert_eq!(collector.runs.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn run_once_swallows_errors() {
        let failing = SlowCollector {
            fail: true,
            ..Default::default()
        };
        assert!(run_once(&failing).await.is_none());

        let working = SlowCollector::default();
        assert_eq!(run_once(&working).await, Some(CycleReport::default()));
    }
}
