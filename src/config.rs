use crate::error::{Result, TrackerError};
use crate::map::DEFAULT_ZOOM_LEVEL;
use crate::types::Coords;
use crate::utils::parse_coords;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_STORAGE_KEY: &str = "save-workout";
pub const POSITION_ENV: &str = "WAYMARK_POSITION";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Zoom used when the map loads and when recentering on a workout.
    pub map_zoom_level: u8,
    /// Key the workout snapshot is stored under.
    pub storage_key: String,
    /// Answer to the startup position lookup. Unset means "unavailable".
    pub position: Option<Position>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_zoom_level: DEFAULT_ZOOM_LEVEL,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            position: None,
        }
    }
}

pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "waymark")
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.data_dir().to_path_buf())
}

pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "waymark").map_or_else(
        || PathBuf::from("waymark.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

pub fn default_db_path() -> PathBuf {
    data_dir().join("waymark.sqlite")
}

/// Load `config.toml`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| TrackerError::Config(format!("{}: {e}", path.display())))?;

    if let Some(p) = config.position
        && !Coords::new(p.lat, p.lng).in_range()
    {
        return Err(TrackerError::Config(format!(
            "{}: position {},{} is out of range",
            path.display(),
            p.lat,
            p.lng
        )));
    }

    Ok(config)
}

/// One-shot lookup of where the user currently is.
pub trait Locator {
    fn current_position(&self) -> Result<Coords>;
}

/// Position taken from `WAYMARK_POSITION`, falling back to the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocator {
    position: Option<Coords>,
}

impl ConfiguredLocator {
    pub const fn fixed(position: Option<Coords>) -> Self {
        Self { position }
    }

    pub fn from_env_or(config: &AppConfig) -> Self {
        let from_env = std::env::var(POSITION_ENV).ok().and_then(|raw| {
            let parsed = parse_coords(&raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "ignoring malformed {POSITION_ENV}");
            }
            parsed
        });

        let position = from_env.or_else(|| config.position.map(|p| Coords::new(p.lat, p.lng)));
        Self { position }
    }
}

impl Locator for ConfiguredLocator {
    fn current_position(&self) -> Result<Coords> {
        self.position.ok_or(TrackerError::GeolocationUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.map_zoom_level, 13);
        assert_eq!(cfg.storage_key, "save-workout");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "map_zoom_level = 15\n\n[position]\nlat = 38.72\nlng = -9.14\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.map_zoom_level, 15);
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.position, Some(Position { lat: 38.72, lng: -9.14 }));
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[position]\nlat = 120.0\nlng = 0.0\n").unwrap();

        assert!(matches!(load_config(&path), Err(TrackerError::Config(_))));
    }

    #[test]
    fn locator_without_position_is_unavailable() {
        let loc = ConfiguredLocator::fixed(None);
        assert!(matches!(
            loc.current_position(),
            Err(TrackerError::GeolocationUnavailable)
        ));

        let loc = ConfiguredLocator::fixed(Some(Coords::new(1.0, 2.0)));
        assert_eq!(loc.current_position().unwrap(), Coords::new(1.0, 2.0));
    }
}
