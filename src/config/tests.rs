use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
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
fn resolve_config_path_prefers_stagefront_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("STAGEFRONT_CONFIG_PATH", "/tmp/stagefront-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/stagefront-test-config.toml")
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
            .join("stagefront")
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
            .join("stagefront")
            .join("config.toml")
    );
}

#[test]
fn default_data_dir_falls_back_to_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/share/stagefront")
    );
}

#[test]
fn page_path_defaults_next_to_config_file() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("STAGEFRONT_CONFIG_PATH", "/tmp/sf/config.toml");

    let s = Settings::default();
    assert_eq!(
        s.page_path().unwrap(),
        std::path::PathBuf::from("/tmp/sf/page.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[shop]
currency_symbol = "$"
placeholder_image = "img/none.png"
checkout_clear_delay_ms = 250
page_path = "/srv/shop/page.toml"

[player]
initial_volume = 0.5
seek_step_seconds = 10
volume_step = 0.25
poll_interval_ms = 500
default_artist = "Someone"

[storage]
data_dir = "/tmp/stagefront-data"

[library]
dir = "/srv/music"
extensions = ["mp3"]
recursive = false

[ui]
header_text = "hello"
toast_ms = 1500

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("STAGEFRONT_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("STAGEFRONT__SHOP__CHECKOUT_CLEAR_DELAY_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.shop.currency_symbol, "$");
    assert_eq!(s.shop.placeholder_image, "img/none.png");
    assert_eq!(s.shop.checkout_clear_delay_ms, 250);
    assert_eq!(
        s.page_path().unwrap(),
        std::path::PathBuf::from("/srv/shop/page.toml")
    );
    assert_eq!(s.player.initial_volume, 0.5);
    assert_eq!(s.player.seek_step_seconds, 10);
    assert_eq!(s.player.volume_step, 0.25);
    assert_eq!(s.player.poll_interval_ms, 500);
    assert_eq!(s.player.default_artist, "Someone");
    assert_eq!(
        s.data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/stagefront-data")
    );
    assert_eq!(s.library.dir, Some(std::path::PathBuf::from("/srv/music")));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.toast_ms, 1500);
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[shop]
checkout_clear_delay_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("STAGEFRONT_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("STAGEFRONT__SHOP__CHECKOUT_CLEAR_DELAY_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.shop.checkout_clear_delay_ms, 0);
}

#[test]
fn validate_rejects_zero_poll_interval_and_bad_volumes() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.player.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.volume_step = 0.0;
    assert!(s.validate().is_err());
}
