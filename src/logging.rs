use eyre::{
    eyre,
    Result,
};
use nri_spark_config::Config;
use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{
        RollingFileAppender,
        Rotation,
    },
};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Rotated log files kept next to the current one.
const MAX_LOG_FILES: usize = 3;

/// Installs the global subscriber: stderr, the configured log file and the `ErrorLayer` span traces.
///
/// The returned guard flushes the file writer on drop and has to live as long as the process logs.
pub fn log_init(config: &Config) -> Result<WorkerGuard> {
    let appender = file_appender(&config.log_file)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    Ok(guard)
}

/// `RUST_LOG` when set, the configured `log_level` otherwise.
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.log_level.level_filter().into())
        .from_env_lossy()
}

fn file_appender(log_file: &Path) -> Result<RollingFileAppender> {
    let file_name = log_file
        .file_name()
        .ok_or_else(|| eyre!("log_file {} has no file name", log_file.display()))?;
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name.to_string_lossy())
        .max_log_files(MAX_LOG_FILES)
        .build(directory)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use temp_dir::TempDir;

    #[test]
    fn file_appender_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("logs").join("nri-spark.log");

        let mut appender = file_appender(&log_file).unwrap();
        appender.write_all(b"collection cycle finished\n").unwrap();
        appender.flush().unwrap();

        let written: Vec<_> = std::fs::read_dir(dir.path().join("logs"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with("nri-spark.log"), "{written:?}");
    }

    #[test]
    fn log_file_without_name_is_rejected() {
        assert!(file_appender(Path::new("/")).is_err());
    }
}
