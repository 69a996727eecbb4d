//! Configuration loading tests

use std::fs;
use tempfile::TempDir;

use usergate::config::loader::{apply_env_overrides, default_config_content, load_config_from_path};
use usergate::config::{save_config, Config};
use usergate::Error;

#[test]
fn test_default_file_parses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("usergate.toml");
    fs::write(&path, default_config_content()).unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.auth.token_ttl_hours, 72);
    assert_eq!(config.auth.bcrypt_cost, 10);
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("usergate.toml");

    let mut config = Config::default();
    config.server.port = 9100;
    config.database.url = "postgres://localhost/usergate_test".to_string();
    config.auth.jwt_secret = "saved-secret".to_string();
    save_config(&config, &path).unwrap();

    let loaded = load_config_from_path(&path).unwrap();
    assert_eq!(loaded.server.port, 9100);
    assert_eq!(loaded.database.url, "postgres://localhost/usergate_test");
    assert_eq!(loaded.auth.jwt_secret, "saved-secret");
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("usergate.toml");
    fs::write(&path, "[auth]\njwt_secret = \"partial\"\n").unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.auth.jwt_secret, "partial");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn test_missing_file_is_config_not_found() {
    let dir = TempDir::new().unwrap();
    let result = load_config_from_path(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
}

#[test]
fn test_environment_wins_over_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("usergate.toml");
    fs::write(
        &path,
        "[server]\nport = 7000\n[auth]\njwt_secret = \"from-file\"\n",
    )
    .unwrap();

    let mut config = load_config_from_path(&path).unwrap();
    apply_env_overrides(&mut config, |key| match key {
        "PORT" => Some("7100".to_string()),
        "JWT_SECRET" => Some("from-env".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.server.port, 7100);
    assert_eq!(config.auth.jwt_secret, "from-env");
}

#[test]
fn test_serve_requirements() {
    let mut config = Config::default();
    assert!(config.validate(false).is_err());

    config.auth.jwt_secret = "set".to_string();
    assert!(config.validate(false).is_ok());

    config.database.url = String::new();
    assert!(config.validate(true).is_err());
}
