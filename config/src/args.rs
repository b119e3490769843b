use clap::Parser;
use eyre::{
    bail,
    Context as _,
    Result,
};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Spark metrics collector for New Relic
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing `config.yml`. Defaults to the current working directory.
    #[clap(short = 'c', long = "config_dir", env = "CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Args {
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine the current working directory"),
        }
    }

    /// Path of the configuration document, which must exist.
    pub fn config_file(&self) -> Result<PathBuf> {
        let path = self.config_dir()?.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            bail!("config file {} not found", path.display());
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn short_and_long_flags() {
        let args = Args::try_parse_from(["nri-spark", "-c", "/etc/nri-spark"]).unwrap();
        assert_eq!(args.config_dir, Some(PathBuf::from("/etc/nri-spark")));

        let args = Args::try_parse_from(["nri-spark", "--config_dir", "/opt/conf"]).unwrap();
        assert_eq!(args.config_dir, Some(PathBuf::from("/opt/conf")));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["nri-spark", "--interval", "5"]).is_err());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            config_dir: Some(dir.path().to_path_buf()),
        };
        let err = args.config_file().unwrap_err();
        assert!(err.to_string().starts_with("config file "));
        assert!(err.to_string().ends_with("config.yml not found"));

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "run_as_service: false\n").unwrap();
        assert_eq!(args.config_file().unwrap(), dir.path().join("config.yml"));
    }
}
