use super::load::{default_cache_path, default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_choralith_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CHORALITH_CONFIG_PATH", "/tmp/choralith-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/choralith-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("choralith")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("choralith")
            .join("config.toml")
    );
}

#[test]
fn default_cache_path_follows_xdg_cache_home_then_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CACHE_HOME", "/tmp/xdg-cache");
    assert_eq!(
        default_cache_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-cache/choralith/snapshots.json")
    );

    let _g2 = EnvGuard::remove("XDG_CACHE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_cache_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.cache/choralith/snapshots.json")
    );
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert!(!s.scan.follow_links);
    assert_eq!(s.scan.progress, ProgressMode::Stride);
    assert_eq!(s.scan.progress_stride, 5);
    assert!(s.cache.enabled);
    assert!(s.cache.path.is_none());
    assert_eq!(
        s.display.fields,
        vec![TrackDisplayField::Artist, TrackDisplayField::Title]
    );
    assert_eq!(s.log.filter, "info");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_stride_and_empty_fields() {
    let mut s = Settings::default();
    s.scan.progress_stride = 0;
    assert!(s.validate().is_err());

    // Stride is irrelevant in interval mode.
    s.scan.progress = ProgressMode::Interval;
    assert!(s.validate().is_ok());

    s.display.fields.clear();
    assert!(s.validate().is_err());
}

#[test]
fn cache_path_prefers_configured_file() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CACHE_HOME", "/tmp/xdg-cache");

    let mut s = Settings::default();
    assert_eq!(
        s.cache_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-cache/choralith/snapshots.json")
    );
    s.cache.path = Some("/tmp/mine.json".into());
    assert_eq!(s.cache_path().unwrap(), std::path::PathBuf::from("/tmp/mine.json"));
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[scan]
follow_links = true
progress = "time"
progress_interval_ms = 40

[cache]
enabled = false
path = "/tmp/elsewhere.json"

[display]
fields = ["filename", "duration"]
separator = " :: "

[log]
filter = "choralith=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CHORALITH_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CHORALITH__SCAN__PROGRESS_STRIDE");

    let s = Settings::load().unwrap();
    assert!(s.scan.follow_links);
    assert_eq!(s.scan.progress, ProgressMode::Interval);
    assert_eq!(s.scan.progress_interval_ms, 40);
    assert_eq!(s.scan.progress_stride, 5);
    assert!(!s.cache.enabled);
    assert_eq!(
        s.cache.path,
        Some(std::path::PathBuf::from("/tmp/elsewhere.json"))
    );
    assert_eq!(
        s.display.fields,
        vec![TrackDisplayField::Filename, TrackDisplayField::Duration]
    );
    assert_eq!(s.display.separator, " :: ");
    assert_eq!(s.log.filter, "choralith=debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[scan]
progress_stride = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CHORALITH_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CHORALITH__SCAN__PROGRESS_STRIDE", "3");

    let s = Settings::load().unwrap();
    assert_eq!(s.scan.progress_stride, 3);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "CHORALITH_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("CHORALITH__SCAN__PROGRESS_STRIDE");

    let s = Settings::load().unwrap();
    assert_eq!(s.scan.progress_stride, 5);
    assert!(s.cache.enabled);
}
