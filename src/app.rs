use color_eyre::Result;
use nri_spark_collector::{
    scheduler::run_once,
    Mode,
    Orchestrator,
    PeriodicTask,
};
use nri_spark_config::{
    Args,
    Config,
};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

use crate::logging::log_init;

pub struct App {
    config: Config,
    _log_guard: WorkerGuard,
}

impl App {
    /// Loads the configuration file and starts logging.
    pub fn new(args: Args) -> Result<Self> {
        let config_file = args.config_file()?;
        let config = Config::load(&config_file)?;
        let log_guard = log_init(&config)?;

        info!(
            config_file = %config_file.display(),
            cluster_name = %config.spark.cluster_name,
            cluster_mode = config.spark.cluster_mode.as_deref().unwrap_or("unknown"),
            log_level = %config.log_level,
            "Starting Spark event collector"
        );

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub async fn run(self) -> Result<()> {
        let collector = Arc::new(Orchestrator::new(&self.config)?);

        match Mode::from_config(&self.config) {
            Mode::OneShot => {
                info!("Running a single collection cycle");
                run_once(collector.as_ref()).await;
            }
            Mode::Service { period } => {
                info!(poll_interval_secs = period.as_secs(), "Running as a service");
                PeriodicTask::new(period).run(collector, shutdown_signal()).await;
            }
        }

        info!("Spark event collector stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for the shutdown signal, running until killed: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
