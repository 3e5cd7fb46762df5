use register_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.csv_delimiter, ';');
    assert_eq!(cfg.precision(), 2);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.currency = "CHF".to_string();
    cfg.last_opened_register = Some("head_office".into());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "CHF");
    assert_eq!(loaded.last_opened_register.as_deref(), Some("head_office"));
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults_and_partial_files_fill_in() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().unwrap(), Config::default());

    std::fs::write(
        manager.config_path(),
        r#"{ "locale": "de-CH", "currency": "CHF" }"#,
    )
    .unwrap();
    let loaded = manager.load().unwrap();
    assert_eq!(loaded.locale, "de-CH");
    assert!(loaded.ui_color_enabled);
    assert_eq!(loaded.csv_delimiter, ';');
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("currency", "usd").unwrap();
    let name = manager.backup(&cfg, Some("Before change")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-change.json"));

    assert_eq!(manager.list_backups().unwrap(), vec![name.clone()]);
    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.currency, "USD");

    let err = manager.restore("config_missing.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
