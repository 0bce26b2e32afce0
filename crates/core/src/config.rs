//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.toml` in the user's
//! config directory, then `BELAVIA_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::save::DEFAULT_SAVE_FILE;

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "belavia";

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_SUPPORT_CONTACT: &str =
    "Contact us to delete your account (polibud@pb.edu.pl)";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Belavia operator console configuration.

# File used by save/load. Relative paths resolve against the working directory.
data_file = "data.txt"

# Directory receiving belavia.log.
log_dir = "logs"

# Shown when an operator asks to delete a client.
support_contact = "Contact us to delete your account (polibud@pb.edu.pl)"
"#;

/// Runtime settings for the operator console.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Save file shared by save and load.
    pub data_file: PathBuf,
    /// Directory for log output.
    pub log_dir: PathBuf,
    /// Message displayed instead of deleting a client.
    pub support_contact: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_SAVE_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            support_contact: DEFAULT_SUPPORT_CONTACT.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (optional) layered under the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .set_default("data_file", DEFAULT_SAVE_FILE)?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .set_default("support_contact", DEFAULT_SUPPORT_CONTACT)?
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("BELAVIA"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

/// Location of `config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("config.toml")
}

/// Write the commented default configuration if no config file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.data_file, PathBuf::from("data.txt"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert!(config.support_contact.contains("Contact us"));
        Ok(())
    }

    #[test]
    fn file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_file = \"/var/lib/belavia/fleet.txt\"\n")?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.data_file, PathBuf::from("/var/lib/belavia/fleet.txt"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        Ok(())
    }

    #[test]
    fn default_template_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        assert!(path.exists());

        fs::write(&path, "log_dir = \"elsewhere\"\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "log_dir = \"elsewhere\"\n");

        fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        assert_eq!(AppConfig::load_from(&path)?, AppConfig::default());
        Ok(())
    }
}
