use crate::databases::discovery::{default_extensions, default_reserved_name, DiscoveryOptions};
use crate::input::UnitKeys;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub databases: DatabasesConfig,
    /// Parameter keys used for the unit roles
    #[serde(default)]
    pub units: UnitKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabasesConfig {
    /// Root directory scanned for databases. Defaults to `databases/` next
    /// to the executable.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// File extensions treated as plugin libraries
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Base name never treated as a plugin
    #[serde(default = "default_reserved_name")]
    pub reserved_name: String,
}

impl Default for DatabasesConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extensions: default_extensions(),
            reserved_name: default_reserved_name(),
        }
    }
}

impl DatabasesConfig {
    /// Resolve the database root directory
    ///
    /// # Errors
    /// Returns an error if no directory is configured and the executable
    /// path cannot be determined.
    pub fn root_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe().context("Failed to locate executable")?;
        let install_dir = exe
            .parent()
            .context("Executable has no parent directory")?;

        Ok(install_dir.join("databases"))
    }

    #[must_use]
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            extensions: self.extensions.clone(),
            reserved_name: self.reserved_name.clone(),
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config =
            serde_yaml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(path.as_ref(), contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get default configuration path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;

        Ok(home.join(".iprkit").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Role;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.databases.dir.is_none());
        assert_eq!(config.databases.extensions, vec!["so", "dylib", "dll"]);
        assert_eq!(config.databases.reserved_name, "mod");
        assert_eq!(config.units, UnitKeys::default());
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
databases:
  dir: /opt/iprkit/databases
units:
  energy: E_unit
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.databases.dir.as_deref(),
            Some(Path::new("/opt/iprkit/databases"))
        );
        assert_eq!(config.databases.extensions, vec!["so", "dylib", "dll"]);
        assert_eq!(config.units.key(Role::Energy), "E_unit");
        assert_eq!(config.units.key(Role::Pressure), "pressure_unit");
    }

    #[test]
    fn test_configured_root_dir() {
        let config = DatabasesConfig {
            dir: Some(PathBuf::from("/data/dbs")),
            ..DatabasesConfig::default()
        };
        assert_eq!(config.root_dir().unwrap(), PathBuf::from("/data/dbs"));
    }

    #[test]
    fn test_default_root_dir_is_next_to_executable() {
        let root = DatabasesConfig::default().root_dir().unwrap();
        assert!(root.ends_with("databases"));
    }
}
