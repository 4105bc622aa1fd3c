//! Settings loading: JSON files, defaults and `AH_*` overrides.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use ah_receipts::config::{self, Settings};
use ah_receipts::ReceiptError;
use tempfile::NamedTempFile;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn write_settings(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn defaults() {
    let settings = Settings::default();
    assert_eq!(settings.access_token, None);
    assert_eq!(settings.base_url, config::DEFAULT_BASE_URL);
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.timeout(), Duration::from_secs(10));
    assert_eq!(settings.min_time_between_updates(), Duration::from_secs(1800));
    assert_eq!(settings.scan_interval(), Duration::from_secs(30));
    assert!(settings.keep_snapshot_on_error);
}

#[test]
fn from_file_fills_missing_keys_with_defaults() {
    let file = write_settings(r#"{"access_token": "abc", "page_size": 25}"#);
    let settings = Settings::from_file(file.path()).unwrap();

    assert_eq!(settings.access_token.as_deref(), Some("abc"));
    assert_eq!(settings.page_size, 25);
    assert_eq!(settings.base_url, config::DEFAULT_BASE_URL);
    assert_eq!(settings.timeout_secs, 10);
}

#[test]
fn from_file_rejects_malformed_json() {
    let file = write_settings("{ access_token: ");
    assert!(matches!(
        Settings::from_file(file.path()),
        Err(ReceiptError::Json(_))
    ));
}

#[test]
fn from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Settings::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ReceiptError::Io(_))));
}

#[test]
fn overrides_replace_file_values() {
    let mut settings = Settings {
        access_token: Some("from-file".to_string()),
        ..Settings::default()
    };
    settings
        .apply_overrides(lookup(&[
            ("AH_ACCESS_TOKEN", "from-env"),
            ("AH_BASE_URL", "http://localhost:9999"),
            ("AH_PAGE_SIZE", " 10 "),
            ("AH_TIMEOUT_SECS", "3"),
            ("AH_MIN_TIME_BETWEEN_UPDATES_SECS", "120"),
            ("AH_SCAN_INTERVAL_SECS", "5"),
        ]))
        .unwrap();

    assert_eq!(settings.access_token.as_deref(), Some("from-env"));
    assert_eq!(settings.base_url, "http://localhost:9999");
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.timeout(), Duration::from_secs(3));
    assert_eq!(settings.min_time_between_updates(), Duration::from_secs(120));
    assert_eq!(settings.scan_interval(), Duration::from_secs(5));
}

#[test]
fn absent_overrides_change_nothing() {
    let mut settings = Settings::default();
    settings.apply_overrides(lookup(&[])).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn non_numeric_override_is_config_error() {
    let mut settings = Settings::default();
    let result = settings.apply_overrides(lookup(&[("AH_PAGE_SIZE", "fifty")]));
    assert!(matches!(result, Err(ReceiptError::Config(_))));
}

#[test]
fn load_reads_explicit_path() {
    let file = write_settings(r#"{"base_url": "http://example.test", "keep_snapshot_on_error": false}"#);
    let settings = Settings::load(Some(file.path())).unwrap();

    assert_eq!(settings.base_url, "http://example.test");
    assert!(!settings.keep_snapshot_on_error);
}

#[test]
fn default_config_path_is_json_file() {
    let path = config::default_config_path();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
}
