use crate::Placeholder;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_MASTER_PARAMS_FILE: &str = "/tmp/master-params";
pub const DEFAULT_DRIVER_ENV_FILE: &str = "/tmp/driver-env.sh";

#[derive(Clone, Debug, Deserialize)]
pub struct SparkConfig {
    pub cluster_name: String,
    #[serde(default)]
    pub cluster_mode: Option<String>,
    #[serde(default)]
    pub master_ui_port: Placeholder<u16>,
    #[serde(default)]
    pub conf_ui_port: Placeholder<u16>,
    #[serde(default)]
    pub driver_host: Placeholder<String>,
    /// Whitespace separated file written by the cluster init scripts, the second token is the master UI port.
    #[serde(default = "default_master_params_file")]
    pub master_params_file: PathBuf,
    /// `KEY=value` file exported by the driver, provides `CONF_PUBLIC_DNS` and `CONF_UI_PORT`.
    #[serde(default = "default_driver_env_file")]
    pub driver_env_file: PathBuf,
}

fn default_master_params_file() -> PathBuf {
    PathBuf::from(DEFAULT_MASTER_PARAMS_FILE)
}

fn default_driver_env_file() -> PathBuf {
    PathBuf::from(DEFAULT_DRIVER_ENV_FILE)
}
