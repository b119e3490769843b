#[macro_use]
extern crate tracing;

mod args;
mod log_level;
mod newrelic_config;
mod placeholder;
mod spark_config;

pub use args::{
    Args,
    CONFIG_FILE_NAME,
};
pub use log_level::LogLevel;
pub use newrelic_config::{
    ApiEndpoint,
    ApiKey,
    NewRelicConfig,
    EU_EVENTS_ENDPOINT,
    US_EVENTS_ENDPOINT,
};
pub use placeholder::Placeholder;
pub use spark_config::{
    SparkConfig,
    DEFAULT_DRIVER_ENV_FILE,
    DEFAULT_MASTER_PARAMS_FILE,
};

use eyre::{
    bail,
    eyre,
    Context as _,
    Result,
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

/// Static labels attached to every event.
pub type Labels = BTreeMap<String, String>;

/// Prefix of environment variables that override configuration keys, e.g. `NRI_SPARK_NEWRELIC__API_KEY`.
pub const ENV_PREFIX: &str = "NRI_SPARK";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_LOG_FILE: &str = "/tmp/nri-spark.log";

#[derive(Clone, Debug)]
pub struct Config {
    pub run_as_service: bool,
    pub poll_interval: Duration,
    pub log_level: LogLevel,
    pub log_file: PathBuf,
    pub spark: SparkConfig,
    pub newrelic: NewRelicConfig,
    pub labels: Labels,
}

/// The configuration document as written on disk. Sections are optional here so that a missing section can be
/// reported by name.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    run_as_service: bool,
    #[serde(default = "default_poll_interval")]
    poll_interval: u64,
    #[serde(default)]
    log_level: LogLevel,
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
    #[serde(default)]
    spark: Option<SparkConfig>,
    #[serde(default)]
    newrelic: Option<NewRelicConfig>,
    #[serde(default)]
    labels: Option<Labels>,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl TryFrom<ConfigFile> for Config {
    type Error = eyre::Report;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let spark = file.spark.ok_or_else(|| eyre!(r#"config file is missing "spark" section"#))?;
        let newrelic = file
            .newrelic
            .ok_or_else(|| eyre!(r#"config file is missing "newrelic" section"#))?;
        if file.poll_interval == 0 {
            bail!("poll_interval must be at least one second");
        }

        Ok(Self {
            run_as_service: file.run_as_service,
            poll_interval: Duration::from_secs(file.poll_interval),
            log_level: file.log_level,
            log_file: file.log_file,
            spark,
            newrelic,
            labels: file.labels.unwrap_or_default(),
        })
    }
}

impl Config {
    /// Loads the YAML document at `path`, applying `NRI_SPARK_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );
        let cfg = Self::build(builder).wrap_err_with(|| format!("Failed to load config file {}", path.display()))?;
        debug!(path = %path.display(), ?cfg, "Loaded configuration");
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::build(config::Config::builder().add_source(config::File::from_str(content, config::FileFormat::Yaml)))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let file: ConfigFile = builder.build()?.try_deserialize()?;
        file.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use temp_dir::TempDir;

    const INSTALLER_CONFIG: &str = r#"
integration_name: com.nrlabs.databricks
run_as_service: True
poll_interval: 15
log_level: error
log_file: /tmp/nri-spark-test.log
spark:
  cluster_name: analytics
  cluster_mode: driver_mode
  master_ui_port: <<MASTER_UI_PORT>>
  conf_ui_port: 40001
  driver_host: <<CONF_PUBLIC_DNS>>
newrelic:
  api_endpoint: EU
  account_id: 123456
  api_key: NRII-abc
labels:
  environment: prod
  team: data
"#;

    #[test]
    fn parses_installer_generated_config() {
        let cfg = Config::from_yaml(INSTALLER_CONFIG).unwrap();

        assert!(cfg.run_as_service);
        assert_eq!(cfg.poll_interval, Duration::from_secs(15));
        assert_eq!(cfg.log_level, LogLevel::Error);
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/nri-spark-test.log"));

        assert_eq!(cfg.spark.cluster_name, "analytics");
        assert_eq!(cfg.spark.cluster_mode.as_deref(), Some("driver_mode"));
        assert_eq!(cfg.spark.master_ui_port, Placeholder::Unresolved);
        assert_eq!(cfg.spark.conf_ui_port, Placeholder::Resolved(40001));
        assert_eq!(cfg.spark.driver_host, Placeholder::Unresolved);
        assert_eq!(cfg.spark.master_params_file, PathBuf::from(DEFAULT_MASTER_PARAMS_FILE));
        assert_eq!(cfg.spark.driver_env_file, PathBuf::from(DEFAULT_DRIVER_ENV_FILE));

        assert_eq!(cfg.newrelic.api_endpoint, ApiEndpoint::Eu);
        assert_eq!(cfg.newrelic.account_id, "123456");
        assert_eq!(cfg.newrelic.api_key.expose(), "NRII-abc");
        assert_eq!(
            cfg.newrelic.events_url(),
            "https://insights-collector.eu01.nr-data.net/v1/accounts/123456/events"
        );

        assert_eq!(
            cfg.labels,
            Labels::from([
                ("environment".to_string(), "prod".to_string()),
                ("team".to_string(), "data".to_string()),
            ])
        );
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_yaml(
            r#"
spark:
  cluster_name: c1
  master_ui_port: 8080
  conf_ui_port: 4040
  driver_host: spark-driver
newrelic:
  account_id: "42"
  api_key: key
"#,
        )
        .unwrap();

        assert!(!cfg.run_as_service);
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/nri-spark.log"));
        assert_eq!(cfg.spark.driver_host, Placeholder::Resolved("spark-driver".to_string()));
        assert_eq!(cfg.spark.master_ui_port, Placeholder::Resolved(8080));
        assert_eq!(cfg.newrelic.api_endpoint, ApiEndpoint::Us);
        assert!(cfg.labels.is_empty());
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cfg = Config::from_yaml(
            r#"
log_level: chatty
spark: { cluster_name: c1 }
newrelic: { account_id: 1, api_key: k }
"#,
        )
        .unwrap();
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert_eq!(cfg.spark.driver_host, Placeholder::Unresolved);
    }

    #[test]
    fn null_and_empty_settings_are_unresolved() {
        let cfg = Config::from_yaml(
            r#"
spark:
  cluster_name: c1
  master_ui_port: ~
  conf_ui_port: ""
  driver_host: null
newrelic: { account_id: 1, api_key: k }
"#,
        )
        .unwrap();
        assert_eq!(cfg.spark.master_ui_port, Placeholder::Unresolved);
        assert_eq!(cfg.spark.conf_ui_port, Placeholder::Unresolved);
        assert_eq!(cfg.spark.driver_host, Placeholder::Unresolved);
    }

    #[test]
    fn missing_sections_are_named() {
        let err = Config::from_yaml("newrelic: { account_id: 1, api_key: k }\n").unwrap_err();
        assert_eq!(err.to_string(), r#"config file is missing "spark" section"#);

        let err = Config::from_yaml("spark: { cluster_name: c1 }\n").unwrap_err();
        assert_eq!(err.to_string(), r#"config file is missing "newrelic" section"#);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let err = Config::from_yaml(
            r#"
poll_interval: 0
spark: { cluster_name: c1 }
newrelic: { account_id: 1, api_key: k }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("poll_interval"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, INSTALLER_CONFIG).unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.spark.cluster_name, "analytics");
    }
}
