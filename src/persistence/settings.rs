use crate::notifications::Permission;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Answer to the one-time notification permission prompt
    #[serde(default)]
    pub notification_permission: Permission,

    /// Use emoji glyphs in the list panes
    #[serde(default = "default_true")]
    pub use_emoji: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notification_permission: Permission::Default,
            use_emoji: true,
        }
    }
}

/// Load settings from settings.json
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let Some(content) = crate::persistence::read_file(path)? else {
        return Ok(Settings::default());
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.notification_permission, Permission::Default);
        assert!(settings.use_emoji);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = Settings {
            notification_permission: Permission::Granted,
            use_emoji: false,
        };
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_malformed_settings_error_names_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings"));
        assert!(err.to_string().contains("settings.json"));
    }
}
