//! Configuration file persistence for livemark
//!
//! Loads and saves `Settings` in the platform config directory, with
//! graceful fallback to defaults. An explicit path (JSON or TOML) can be
//! loaded as well, which is what the command line uses.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "livemark";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Temporary file used during atomic writes
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Platform config directory for livemark.
///
/// - **Windows**: `%APPDATA%\livemark\`
/// - **macOS**: `~/Library/Application Support/livemark/`
/// - **Linux**: `~/.config/livemark/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Full path to the configuration file.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default location.
///
/// A missing, empty, or corrupted file yields default settings; the problem
/// is logged and editing carries on.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from_path(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load configuration from an explicit path.
///
/// Files ending in `.toml` are read as TOML, everything else as JSON. A
/// missing or empty file is not an error.
pub fn load_config_from_path(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let settings = if is_toml {
        Settings::from_toml_sanitized(&contents).map_err(|e| {
            warn!("Config file at {} is not valid TOML: {}", path.display(), e);
            Error::from(e)
        })?
    } else {
        Settings::from_json_sanitized(&contents).map_err(|e| {
            warn!("Config file at {} is not valid JSON: {}", path.display(), e);
            Error::from(e)
        })?
    };

    info!("Configuration loaded from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to_dir(settings, &get_config_dir()?)
}

/// Save configuration into `dir` with an atomic write: the JSON goes to a
/// temporary file first, which then replaces `config.json`.
pub fn save_config_to_dir(settings: &Settings, dir: &Path) -> Result<()> {
    ensure_dir(dir)?;
    let config_path = dir.join(CONFIG_FILE_NAME);
    let backup_path = dir.join(CONFIG_BACKUP_NAME);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Best-effort save. Returns `true` on success.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Temporary config directory that disappears with the test.
    struct TestEnv {
        temp_dir: TempDir,
        config_dir: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_dir = temp_dir.path().join(APP_NAME);
            Self {
                temp_dir,
                config_dir,
            }
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.temp_dir.path().join(name);
            fs::write(&path, content).expect("Failed to write config");
            path
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform directory tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_get_config_file_path_mentions_app() {
        if let Ok(path) = get_config_file_path() {
            let display = path.to_string_lossy().to_string();
            assert!(display.contains(APP_NAME));
            assert!(display.ends_with(CONFIG_FILE_NAME));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from_path(&env.config_dir.join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let env = TestEnv::new();
        let path = env.write("config.json", "   \n");
        assert_eq!(load_config_from_path(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_partial_json() {
        let env = TestEnv::new();
        let path = env.write("config.json", r#"{"toolbar": true}"#);
        let settings = load_config_from_path(&path).unwrap();
        assert!(settings.toolbar);
        assert!(settings.context_menu);
    }

    #[test]
    fn test_load_toml_by_extension() {
        let env = TestEnv::new();
        let path = env.write("livemark.toml", "read_only = true\n[extensions]\nmath = true\n");
        let settings = load_config_from_path(&path).unwrap();
        assert!(settings.read_only);
        assert!(settings.extensions.math);
    }

    #[test]
    fn test_load_corrupted_json_is_parse_error() {
        let env = TestEnv::new();
        let path = env.write("config.json", "{ invalid json }");
        let result = load_config_from_path(&path);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let env = TestEnv::new();
        let path = env.write("config.json", r#"{"toast_duration_ms": 1}"#);
        let settings = load_config_from_path(&path).unwrap();
        assert_eq!(settings.toast_duration_ms, Settings::MIN_TOAST_MS);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let env = TestEnv::new();
        let path = env.write("config.json", r#"{"toolbar": true, "future_feature": 3}"#);
        assert!(load_config_from_path(&path).unwrap().toolbar);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_and_load_roundtrip() {
        let env = TestEnv::new();
        let original = Settings {
            toolbar: true,
            line_numbers: true,
            placeholder: "Type here".to_string(),
            ..Settings::default()
        };

        save_config_to_dir(&original, &env.config_dir).unwrap();
        assert!(!env.config_dir.join(CONFIG_BACKUP_NAME).exists());

        let loaded = load_config_from_path(&env.config_dir.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_config_graceful_fallback() {
        // Whatever is on disk, the public loader never fails
        let settings = load_config();
        assert!(settings.toast_duration_ms >= Settings::MIN_TOAST_MS);
    }
}
