//! Configuration loading and root folder resolution
//!
//! Settings come from (highest priority first):
//! 1. Command-line arguments
//! 2. Environment variables (`JC_ROOT_FOLDER`, `JC_DATA_FILE`)
//! 3. TOML config file
//! 4. Built-in defaults
//!
//! A missing or malformed config file is never fatal: a warning is logged and
//! the defaults apply.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "JC_ROOT_FOLDER";
/// Environment variable overriding the data file path
pub const ENV_DATA_FILE: &str = "JC_DATA_FILE";
/// Data file location relative to the root folder
pub const DEFAULT_DATA_FILE: &str = "data/journal_club.json";
/// Default HTTP port for jc-site
pub const DEFAULT_PORT: u16 = 5790;
/// Default bind address for jc-site
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Config file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding `data/`, `sessions.csv` and the PubMed export folders
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit data file path (otherwise `<root>/data/journal_club.json`)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// HTTP bind address
    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Page presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Page heading and `<title>`
    #[serde(default = "default_title")]
    pub title: String,

    /// View shown when the request does not ask for one (list, timeline, deck)
    #[serde(default)]
    pub default_view: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            default_view: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_title() -> String {
    "Journal Club".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the explicit file, or the platform config file, falling back to defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(config_file_path) {
            Some(path) => path,
            None => {
                debug!("No config file found, using defaults");
                return Self::default();
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }
}

/// Resolve the root folder: CLI → `JC_ROOT_FOLDER` → TOML → current directory
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    PathBuf::from(".")
}

/// Resolve the data file: CLI → `JC_DATA_FILE` → TOML → `<root>/data/journal_club.json`
pub fn resolve_data_file(cli_arg: Option<&Path>, root_folder: &Path, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_DATA_FILE) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_file {
        return if path.is_absolute() {
            path.clone()
        } else {
            root_folder.join(path)
        };
    }

    root_folder.join(DEFAULT_DATA_FILE)
}

/// Platform config file, if one exists.
///
/// Linux checks `~/.config/journal-club/config.toml` then
/// `/etc/journal-club/config.toml`; other platforms use the user config dir.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("journal-club").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/journal-club/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_parse_full_config() {
        let config: TomlConfig = toml::from_str(
            r#"
            root_folder = "/srv/jc"
            port = 8080
            bind = "0.0.0.0"

            [site]
            title = "ENT Journal Club"
            default_view = "timeline"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/jc")));
        assert_eq!(config.port(), 8080);
        assert_eq!(config.bind(), "0.0.0.0");
        assert_eq!(config.site.title, "ENT Journal Club");
        assert_eq!(config.site.default_view.as_deref(), Some("timeline"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.bind(), DEFAULT_BIND);
        assert_eq!(config.site.title, "Journal Club");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(TomlConfig::load(&path), Err(Error::Config(_))));
        let config = TomlConfig::load_or_default(Some(&path));
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = TomlConfig::load_or_default(Some(Path::new("/nonexistent/jc/config.toml")));
        assert!(config.root_folder.is_none());
    }

    #[test]
    #[serial]
    fn test_root_folder_priority() {
        env::remove_var(ENV_ROOT_FOLDER);
        let config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };

        assert_eq!(
            resolve_root_folder(Some(Path::new("/from/cli")), &config),
            PathBuf::from("/from/cli")
        );
        assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));

        env::set_var(ENV_ROOT_FOLDER, "/from/env");
        assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/env"));
        env::remove_var(ENV_ROOT_FOLDER);

        assert_eq!(
            resolve_root_folder(None, &TomlConfig::default()),
            PathBuf::from(".")
        );
    }

    #[test]
    #[serial]
    fn test_data_file_resolution() {
        env::remove_var(ENV_DATA_FILE);
        let root = Path::new("/srv/jc");

        assert_eq!(
            resolve_data_file(None, root, &TomlConfig::default()),
            PathBuf::from("/srv/jc/data/journal_club.json")
        );

        let relative = TomlConfig {
            data_file: Some(PathBuf::from("alt/sessions.json")),
            ..Default::default()
        };
        assert_eq!(
            resolve_data_file(None, root, &relative),
            PathBuf::from("/srv/jc/alt/sessions.json")
        );

        env::set_var(ENV_DATA_FILE, "/tmp/override.json");
        assert_eq!(
            resolve_data_file(None, root, &relative),
            PathBuf::from("/tmp/override.json")
        );
        env::remove_var(ENV_DATA_FILE);

        assert_eq!(
            resolve_data_file(Some(Path::new("cli.json")), root, &relative),
            PathBuf::from("cli.json")
        );
    }
}
