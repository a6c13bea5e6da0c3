//! Config file loading and graceful degradation

use jc_common::config::{self, TomlConfig, DEFAULT_DATA_FILE, ENV_DATA_FILE, ENV_ROOT_FOLDER};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "data_file = \"sessions.json\"\n[site]\ntitle = \"Grand Rounds\"\n").unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.site.title, "Grand Rounds");
    assert_eq!(config.data_file, Some(PathBuf::from("sessions.json")));
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let err = TomlConfig::load(&path).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_load_or_default_falls_back() {
    let dir = tempfile::tempdir().unwrap();

    let missing = TomlConfig::load_or_default(Some(dir.path().join("absent.toml").as_path()));
    assert_eq!(missing.site.title, "Journal Club");

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[site\n").unwrap();
    let config = TomlConfig::load_or_default(Some(broken.as_path()));
    assert_eq!(config.port(), config::DEFAULT_PORT);
}

#[test]
#[serial]
fn test_relative_data_file_joins_root() {
    env::remove_var(ENV_ROOT_FOLDER);
    env::remove_var(ENV_DATA_FILE);

    let config: TomlConfig = toml::from_str("root_folder = \"/srv/jc\"\ndata_file = \"out/data.json\"").unwrap();
    let root = config::resolve_root_folder(None, &config);
    assert_eq!(root, PathBuf::from("/srv/jc"));
    assert_eq!(
        config::resolve_data_file(None, &root, &config),
        PathBuf::from("/srv/jc/out/data.json")
    );

    let defaults = TomlConfig::default();
    assert_eq!(
        config::resolve_data_file(None, Path::new("/srv/jc"), &defaults),
        Path::new("/srv/jc").join(DEFAULT_DATA_FILE)
    );
}
