//! Layered runtime configuration (file → environment → CLI).
//!
//! Settings live in a `consulta.toml` next to where the tool runs, falling
//! back to the per-user config directory, falling back to defaults. The
//! environment can override the two registry endpoints, which is mainly
//! useful for pointing the clients at a staging instance.
//!
//! # Configuration File Format
//!
//! ```toml
//! [sri]
//! base_url = "https://srienlinea.sri.gob.ec"
//!
//! [ant]
//! base_url = "https://consultaweb.ant.gob.ec"
//! cache_ttl_secs = 600
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the project directory and the user config dir.
pub const CONFIG_FILE: &str = "consulta.toml";

/// Per-project data directory (history log).
pub const DATA_DIR: &str = ".consulta";

/// Environment override for the SRI endpoint.
pub const ENV_SRI_URL: &str = "CONSULTA_SRI_URL";
/// Environment override for the ANT endpoint.
pub const ENV_ANT_URL: &str = "CONSULTA_ANT_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SriConfig {
    #[serde(default = "default_sri_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntConfig {
    #[serde(default = "default_ant_base_url")]
    pub base_url: String,
    /// How long a resolved points balance is served from the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sri_base_url() -> String {
    "https://srienlinea.sri.gob.ec".to_string()
}

fn default_ant_base_url() -> String {
    "https://consultaweb.ant.gob.ec".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SriConfig {
    fn default() -> Self {
        Self {
            base_url: default_sri_base_url(),
        }
    }
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            base_url: default_ant_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The `consulta.toml` file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultaToml {
    #[serde(default)]
    pub sri: SriConfig,
    #[serde(default)]
    pub ant: AntConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl ConsultaToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from the project directory, then the user config directory,
    /// then defaults. A missing file is not an error; a malformed one is.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let project_file = project_dir.join(CONFIG_FILE);
        if project_file.exists() {
            return Self::load(&project_file);
        }
        if let Some(user_file) = Self::user_config_path()
            && user_file.exists()
        {
            return Self::load(&user_file);
        }
        Ok(Self::default())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("consulta").join(CONFIG_FILE))
    }

    /// Write the default configuration to `path` (for `config init`).
    pub fn write_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

/// Runtime configuration bridging the file layer with the CLI's needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub history_file: PathBuf,
    pub verbose: bool,
    /// Use the offline mock registries instead of the live services.
    pub mock: bool,
    pub toml: ConsultaToml,
}

impl Config {
    pub fn new(project_dir: PathBuf, verbose: bool, mock: bool) -> Result<Self> {
        let mut toml = ConsultaToml::load_or_default(&project_dir)?;

        if let Ok(url) = std::env::var(ENV_SRI_URL) {
            toml.sri.base_url = url;
        }
        if let Ok(url) = std::env::var(ENV_ANT_URL) {
            toml.ant.base_url = url;
        }

        let history_file = project_dir.join(DATA_DIR).join("history");
        Ok(Self {
            project_dir,
            history_file,
            verbose,
            mock,
            toml,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.http.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.toml.ant.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_point_at_the_live_registries() {
        let toml = ConsultaToml::default();
        assert_eq!(toml.sri.base_url, "https://srienlinea.sri.gob.ec");
        assert_eq!(toml.ant.base_url, "https://consultaweb.ant.gob.ec");
        assert_eq!(toml.ant.cache_ttl_secs, 600);
        assert_eq!(toml.http.timeout_secs, 30);
    }

    #[test]
    fn test_load_or_default_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let toml = ConsultaToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.http.timeout_secs, 30);
    }

    #[test]
    fn test_load_project_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[sri]
base_url = "http://localhost:9001"

[ant]
base_url = "http://localhost:9002"
cache_ttl_secs = 5
"#,
        )
        .unwrap();

        let toml = ConsultaToml::load_or_default(dir.path()).unwrap();
        assert_eq!(toml.sri.base_url, "http://localhost:9001");
        assert_eq!(toml.ant.base_url, "http://localhost:9002");
        assert_eq!(toml.ant.cache_ttl_secs, 5);
        // Unspecified sections keep their defaults.
        assert_eq!(toml.http.timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not toml }").unwrap();
        let result = ConsultaToml::load_or_default(dir.path());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config file")
        );
    }

    #[test]
    fn test_write_default_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        ConsultaToml::write_default(&path).unwrap();
        let loaded = ConsultaToml::load(&path).unwrap();
        assert_eq!(loaded.sri.base_url, ConsultaToml::default().sri.base_url);
    }

    #[test]
    fn test_config_derives_paths_and_durations() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf(), false, true).unwrap();
        assert!(config.mock);
        assert_eq!(config.history_file, dir.path().join(".consulta/history"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }
}
