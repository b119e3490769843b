use crate::{
    error::{
        Error,
        Result,
    },
    events::EventKind,
};
use nri_spark_config::{
    Placeholder,
    SparkConfig,
};
use std::path::PathBuf;
use url::Url;

const PUBLIC_DNS_KEY: &str = "CONF_PUBLIC_DNS";
const UI_PORT_KEY: &str = "CONF_UI_PORT";

/// Files written on the driver node by the cluster init scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeFiles {
    pub master_params: PathBuf,
    pub driver_env: PathBuf,
}

impl From<&SparkConfig> for RuntimeFiles {
    fn from(spark: &SparkConfig) -> Self {
        Self {
            master_params: spark.master_params_file.clone(),
            driver_env: spark.driver_env_file.clone(),
        }
    }
}

/// Host and ports of the Spark UIs, some of which may only be known once the runtime files exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkEndpoints {
    pub driver_host: Placeholder<String>,
    pub conf_ui_port: Placeholder<u16>,
    pub master_ui_port: Placeholder<u16>,
}

impl From<&SparkConfig> for SparkEndpoints {
    fn from(spark: &SparkConfig) -> Self {
        Self {
            driver_host: spark.driver_host.clone(),
            conf_ui_port: spark.conf_ui_port.clone(),
            master_ui_port: spark.master_ui_port.clone(),
        }
    }
}

impl SparkEndpoints {
    pub fn is_resolved(&self) -> bool {
        self.driver_host.is_resolved() && self.conf_ui_port.is_resolved() && self.master_ui_port.is_resolved()
    }

    /// Fills unresolved settings from the runtime files.
    ///
    /// A missing or unreadable master params file is logged and leaves the master port unresolved. The driver env
    /// file has no fallback: failing to read it, or it not providing the missing values, is an error.
    pub async fn resolve(&mut self, files: &RuntimeFiles) -> Result<()> {
        if !self.master_ui_port.is_resolved() {
            self.resolve_master_ui_port(files).await;
        }

        if self.driver_host.is_resolved() && self.conf_ui_port.is_resolved() {
            return Ok(());
        }

        let content = tokio::fs::read_to_string(&files.driver_env)
            .await
            .map_err(|source| Error::RuntimeFile {
                path: files.driver_env.clone(),
                source,
            })?;
        let env = DriverEnv::parse(&content);

        if !self.driver_host.is_resolved() {
            if let Some(host) = env.public_dns {
                info!(driver_host = %host, "Extracted spark driver_host from {}", files.driver_env.display());
                self.driver_host.resolve(host);
            }
        }
        if !self.conf_ui_port.is_resolved() {
            match env.ui_port.as_deref().map(str::parse::<u16>) {
                Some(Ok(port)) => {
                    info!(conf_ui_port = port, "Extracted spark conf_ui_port from {}", files.driver_env.display());
                    self.conf_ui_port.resolve(port);
                }
                Some(Err(err)) => error!("Invalid {UI_PORT_KEY} in {}: {err}", files.driver_env.display()),
                None => {}
            }
        }

        if !self.driver_host.is_resolved() {
            return Err(Error::Unresolved("driver_host"));
        }
        if !self.conf_ui_port.is_resolved() {
            return Err(Error::Unresolved("conf_ui_port"));
        }
        Ok(())
    }

    async fn resolve_master_ui_port(&mut self, files: &RuntimeFiles) {
        let path = files.master_params.display();
        match tokio::fs::read_to_string(&files.master_params).await {
            Ok(content) => match parse_master_params(&content) {
                Some(port) => {
                    info!(master_ui_port = port, "Setting spark master_ui_port from {path}");
                    self.master_ui_port.resolve(port);
                }
                None => error!("Error reading master UI port from {path}: expected a port as second token"),
            },
            Err(err) => error!("Error opening {path}: {err}"),
        }
    }

    pub fn driver_host(&self) -> Result<&str> {
        self.driver_host
            .as_resolved()
            .map(String::as_str)
            .ok_or(Error::Unresolved("driver_host"))
    }

    /// `http://{driver_host}:{master_ui_port}/json/`, or `None` while the master port is unknown.
    pub fn master_url(&self) -> Result<Option<Url>> {
        let Some(port) = self.master_ui_port.as_resolved() else {
            return Ok(None);
        };
        let base = base_url(self.driver_host()?, *port)?;
        join(&base, "json/").map(Some)
    }

    /// `http://{driver_host}:{conf_ui_port}/`, the application UI serving the REST API.
    pub fn ui_url(&self) -> Result<Url> {
        let port = self
            .conf_ui_port
            .as_resolved()
            .ok_or(Error::Unresolved("conf_ui_port"))?;
        base_url(self.driver_host()?, *port)
    }
}

/// `{ui_url}api/v1/applications/{app_id}/{category}`
pub fn application_url(ui_url: &Url, app_id: &str, kind: EventKind) -> Result<Url> {
    join(ui_url, &format!("api/v1/applications/{app_id}/{}", kind.api_path()))
}

fn base_url(host: &str, port: u16) -> Result<Url> {
    let address = format!("http://{host}:{port}/");
    Url::parse(&address).map_err(|source| Error::Url { address, source })
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|source| Error::Url {
        address: format!("{base}{path}"),
        source,
    })
}

fn parse_master_params(content: &str) -> Option<u16> {
    content.split_whitespace().nth(1)?.parse().ok()
}

/// Values exported by the driver env script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverEnv {
    pub public_dns: Option<String>,
    pub ui_port: Option<String>,
}

impl DriverEnv {
    pub fn parse(content: &str) -> Self {
        let mut env = DriverEnv::default();
        for line in content.lines() {
            let line = line.trim();
            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim());
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                PUBLIC_DNS_KEY => env.public_dns = Some(value.to_string()),
                UI_PORT_KEY => env.ui_port = Some(value.to_string()),
                _ => {}
            }
        }
        env
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}
